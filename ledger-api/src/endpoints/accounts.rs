use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::Request;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    /// Institution account type, e.g. `depository`, `credit`, `loan`
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub mask: Option<String>,
}

// Requests

#[derive(Default, Debug, Clone)]
pub struct ListAccounts;

impl ListAccounts {
    pub fn new() -> Self {
        Self
    }
}

impl Request for ListAccounts {
    type Data = ();
    type Response = Vec<AccountRecord>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/accounts".into()
    }
}
