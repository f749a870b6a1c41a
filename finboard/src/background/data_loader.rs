use ledger_api::endpoints::RangeQuery;
use tokio::sync::mpsc;

use crate::error::{api_error_kind, DashboardError};
use crate::events::{DataEvent, Effect};
use crate::gateway::GatewayRef;

/// Performs effects against the gateway and reports back as [`DataEvent`]s
#[derive(Clone)]
pub struct DataLoader {
    pub gateway: GatewayRef,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(gateway: GatewayRef, data_tx: mpsc::UnboundedSender<DataEvent>) -> Self {
        Self { gateway, data_tx }
    }

    pub async fn perform(&self, effect: Effect) {
        match effect {
            Effect::LoadAccounts { generation } => self.load_accounts(generation).await,
            Effect::LoadBudgets { generation, query } => {
                self.load_budgets(generation, query).await
            }
            Effect::LoadTransactions { generation, query } => {
                self.load_transactions(generation, query).await
            }
            Effect::LoadBalances { generation, query } => {
                self.load_balances(generation, query).await
            }
            Effect::CreateBudget {
                temp_id,
                category,
                amount,
            } => self.create_budget(temp_id, category, amount).await,
            Effect::UpdateBudget {
                budget_id,
                category,
                amount,
            } => self.update_budget(budget_id, category, amount).await,
            Effect::DeleteBudget { budget_id } => self.delete_budget(budget_id).await,
        }
    }

    fn send(&self, event: DataEvent) {
        if self.data_tx.send(event).is_err() {
            tracing::debug!("Event loop gone, dropping data event");
        }
    }

    pub async fn load_accounts(&self, generation: u64) {
        tracing::debug!("Fetching accounts from API");
        let result = self.gateway.list_accounts().await.map_err(|e| {
            tracing::error!(kind = ?api_error_kind(&e), "Failed to load accounts from API: {}", e);
            DashboardError::from_api(&e, "load accounts")
        });
        self.send(DataEvent::AccountsLoaded { generation, result });
    }

    /// Budget definitions and the month's transactions, as one unit
    pub async fn load_budgets(&self, generation: u64, query: RangeQuery) {
        tracing::debug!("Fetching budgets and transactions ({})", query.to_query_string());
        let result = tokio::try_join!(
            self.gateway.list_budgets(),
            self.gateway.list_transactions(&query)
        )
        .map_err(|e| {
            tracing::error!(kind = ?api_error_kind(&e), "Failed to load budgets from API: {}", e);
            DashboardError::from_api(&e, "load budgets")
        });
        self.send(DataEvent::BudgetsLoaded { generation, result });
    }

    pub async fn load_transactions(&self, generation: u64, query: RangeQuery) {
        tracing::debug!("Fetching transactions ({})", query.to_query_string());
        let result = self.gateway.list_transactions(&query).await.map_err(|e| {
            tracing::error!(kind = ?api_error_kind(&e), "Failed to load transactions from API: {}", e);
            DashboardError::from_api(&e, "load transactions")
        });
        self.send(DataEvent::TransactionsLoaded { generation, result });
    }

    pub async fn load_balances(&self, generation: u64, query: RangeQuery) {
        tracing::debug!("Fetching balances overview ({})", query.to_query_string());
        let result = self.gateway.balances_overview(&query).await.map_err(|e| {
            tracing::error!(kind = ?api_error_kind(&e), "Failed to load balances from API: {}", e);
            DashboardError::from_api(&e, "load balances")
        });
        self.send(DataEvent::BalancesLoaded { generation, result });
    }

    pub async fn create_budget(&self, temp_id: String, category: String, amount: f64) {
        match self.gateway.create_budget(&category, amount).await {
            Ok(budget) => {
                tracing::info!("Created budget {} for {}", budget.id, category);
                self.send(DataEvent::BudgetCreated { temp_id, budget });
            }
            Err(e) => {
                tracing::error!("Failed to create budget for {}: {}", category, e);
                self.send(DataEvent::BudgetCreateFailed {
                    temp_id,
                    error: DashboardError::from_api_for_category(&e, "create budget", &category),
                });
            }
        }
    }

    pub async fn update_budget(&self, budget_id: String, category: String, amount: f64) {
        match self
            .gateway
            .update_budget(&budget_id, &category, amount)
            .await
        {
            Ok(budget) => {
                tracing::info!("Updated budget {}", budget_id);
                self.send(DataEvent::BudgetUpdated { budget_id, budget });
            }
            Err(e) => {
                tracing::error!("Failed to update budget {}: {}", budget_id, e);
                self.send(DataEvent::BudgetUpdateFailed {
                    budget_id,
                    error: DashboardError::from_api_for_category(&e, "update budget", &category),
                });
            }
        }
    }

    pub async fn delete_budget(&self, budget_id: String) {
        match self.gateway.delete_budget(&budget_id).await {
            Ok(()) => {
                tracing::info!("Deleted budget {}", budget_id);
                self.send(DataEvent::BudgetDeleted { budget_id });
            }
            Err(e) => {
                tracing::error!("Failed to delete budget {}: {}", budget_id, e);
                self.send(DataEvent::BudgetDeleteFailed {
                    budget_id,
                    error: DashboardError::from_api(&e, "delete budget"),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Budget;
    use crate::testing::{fixtures, MockGateway};
    use ledger_api::StatusCode;
    use std::sync::Arc;

    fn loader(gateway: Arc<MockGateway>) -> (DataLoader, mpsc::UnboundedReceiver<DataEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DataLoader::new(gateway, tx), rx)
    }

    #[tokio::test]
    async fn create_failure_reports_generic_message() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail("create_budget", StatusCode::INTERNAL_SERVER_ERROR);
        let (loader, mut rx) = loader(gateway.clone());

        loader
            .create_budget("temp-1".into(), "groceries".into(), 200.0)
            .await;

        match rx.recv().await {
            Some(DataEvent::BudgetCreateFailed { temp_id, error }) => {
                assert_eq!(temp_id, "temp-1");
                assert_eq!(error.to_string(), "Failed to create budget.");
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(gateway.calls("create_budget"), 1);
    }

    #[tokio::test]
    async fn conflict_on_create_names_category() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail("create_budget", StatusCode::CONFLICT);
        let (loader, mut rx) = loader(gateway);

        loader
            .create_budget("temp-1".into(), "FOOD_AND_DRINK".into(), 10.0)
            .await;

        match rx.recv().await {
            Some(DataEvent::BudgetCreateFailed { error, .. }) => {
                assert_eq!(error, DashboardError::DuplicateCategory("Food And Drink".into()));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn unauthorized_load_asks_for_login() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail("list_transactions", StatusCode::UNAUTHORIZED);
        let (loader, mut rx) = loader(gateway);

        loader.load_transactions(4, RangeQuery::new()).await;

        match rx.recv().await {
            Some(DataEvent::TransactionsLoaded { generation, result }) => {
                assert_eq!(generation, 4);
                assert_eq!(result, Err(DashboardError::NotAuthenticated));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn budgets_load_fetches_both_lists() {
        let gateway = Arc::new(
            MockGateway::new()
                .with_budgets(vec![Budget {
                    id: "b1".into(),
                    category: "GROCERIES".into(),
                    amount: 200.0,
                }])
                .with_transactions(vec![fixtures::transaction("t1", "2024-01-04", "GROCERIES", 150.0)]),
        );
        let (loader, mut rx) = loader(gateway.clone());

        loader.perform(Effect::LoadBudgets { generation: 1, query: RangeQuery::new() }).await;

        match rx.recv().await {
            Some(DataEvent::BudgetsLoaded { result: Ok((budgets, transactions)), .. }) => {
                assert_eq!(budgets.len(), 1);
                assert_eq!(transactions.len(), 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(gateway.calls("list_budgets"), 1);
        assert_eq!(gateway.calls("list_transactions"), 1);
    }
}
