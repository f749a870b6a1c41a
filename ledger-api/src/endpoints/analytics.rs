use super::{RangeQuery, amount, endpoint_with_query};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::Request;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalanceRecord {
    pub account_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub current_balance: f64,
    #[serde(default, deserialize_with = "amount::option::deserialize")]
    pub available_balance: Option<f64>,
}

// Requests

/// Latest balance snapshot per account.
///
/// The date range is forwarded but the gateway currently ignores it and always
/// answers with the most recent balances.
#[derive(Default, Debug, Clone)]
pub struct GetBalancesOverview {
    query: RangeQuery,
}

impl GetBalancesOverview {
    pub fn new(query: RangeQuery) -> Self {
        Self { query }
    }
}

impl Request for GetBalancesOverview {
    type Data = ();
    type Response = BalancesOverviewResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        endpoint_with_query("/analytics/balances-overview", &self.query).into()
    }
}

// Responses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancesOverviewResponse {
    pub accounts: Vec<AccountBalanceRecord>,
}
