pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::LedgerApiError;
pub use tower_api_client::StatusCode;
use repositories::*;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub struct Client {
    inner: ApiClient,
}

impl Client {
    /// Build a client for the gateway at `base_url`, e.g. `https://ledger.example.com/api`
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url),
        }
    }

    pub fn with_token(base_url: &str, access_token: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url).bearer_auth(access_token),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, LedgerApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn accounts() -> AccountRepository {
        AccountRepository::new()
    }

    pub fn analytics() -> AnalyticsRepository {
        AnalyticsRepository::new()
    }

    pub fn budgets() -> BudgetRepository {
        BudgetRepository::new()
    }

    pub fn transactions() -> TransactionRepository {
        TransactionRepository::new()
    }
}
