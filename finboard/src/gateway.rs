use std::sync::Arc;

use async_trait::async_trait;
use ledger_api::{endpoints::RangeQuery, Client, LedgerApiError, Request};

use crate::model::{Account, BalancesOverview, Budget, Transaction};

/// Remote ledger and budget store
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerApiError>;

    async fn list_transactions(&self, query: &RangeQuery) -> Result<Vec<Transaction>, LedgerApiError>;

    async fn list_budgets(&self) -> Result<Vec<Budget>, LedgerApiError>;

    async fn create_budget(&self, category: &str, amount: f64) -> Result<Budget, LedgerApiError>;

    async fn update_budget(
        &self,
        budget_id: &str,
        category: &str,
        amount: f64,
    ) -> Result<Budget, LedgerApiError>;

    async fn delete_budget(&self, budget_id: &str) -> Result<(), LedgerApiError>;

    async fn balances_overview(&self, query: &RangeQuery) -> Result<BalancesOverview, LedgerApiError>;
}

pub type GatewayRef = Arc<dyn LedgerGateway>;

#[async_trait]
impl LedgerGateway for Client {
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerApiError> {
        let records = self.send(Request::accounts().list()).await?;
        Ok(records.into_iter().map(Account::from).collect())
    }

    async fn list_transactions(&self, query: &RangeQuery) -> Result<Vec<Transaction>, LedgerApiError> {
        let records = self
            .send(Request::transactions().list(query.clone()))
            .await?;
        Ok(records.into_iter().map(Transaction::from).collect())
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>, LedgerApiError> {
        let records = self.send(Request::budgets().list()).await?;
        Ok(records.into_iter().map(Budget::from).collect())
    }

    async fn create_budget(&self, category: &str, amount: f64) -> Result<Budget, LedgerApiError> {
        let record = self.send(Request::budgets().create(category, amount)).await?;
        Ok(record.into())
    }

    async fn update_budget(
        &self,
        budget_id: &str,
        category: &str,
        amount: f64,
    ) -> Result<Budget, LedgerApiError> {
        let record = self
            .send(Request::budgets().update(budget_id, category, amount))
            .await?;
        Ok(record.into())
    }

    async fn delete_budget(&self, budget_id: &str) -> Result<(), LedgerApiError> {
        self.send(Request::budgets().delete(budget_id)).await?;
        Ok(())
    }

    async fn balances_overview(&self, query: &RangeQuery) -> Result<BalancesOverview, LedgerApiError> {
        let response = self
            .send(Request::analytics().balances_overview(query.clone()))
            .await?;
        Ok(response.into())
    }
}
