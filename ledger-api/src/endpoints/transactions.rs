use super::{RangeQuery, amount, day, endpoint_with_query};
use crate::macros::setter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::Request;

// Common

/// Ledger row as returned by the gateway. Positive amounts are outflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    #[serde(deserialize_with = "day::deserialize")]
    pub date: NaiveDate,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub category_primary: Option<String>,
    #[serde(default)]
    pub category_detailed: Option<String>,
    #[serde(default)]
    pub category_confidence: Option<String>,
    pub account_name: String,
    pub account_type: String,
    #[serde(default)]
    pub account_mask: Option<String>,
    #[serde(default, deserialize_with = "amount::option::deserialize")]
    pub running_balance: Option<f64>,
}

// Requests

#[derive(Default, Debug, Clone)]
pub struct ListTransactions {
    query: RangeQuery,
}

impl ListTransactions {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(query: RangeQuery);

    pub fn range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.query = self.query.range(start, end);
        self
    }

    pub fn account_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = self.query.account_ids(ids);
        self
    }
}

impl Request for ListTransactions {
    type Data = ();
    type Response = Vec<TransactionRecord>;

    fn endpoint(&self) -> Cow<'_, str> {
        endpoint_with_query("/transactions", &self.query).into()
    }
}
