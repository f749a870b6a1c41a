use crate::endpoints::{
    RangeQuery,
    accounts::ListAccounts,
    analytics::GetBalancesOverview,
    budgets::{CreateBudget, DeleteBudget, ListBudgets, UpdateBudget},
    transactions::ListTransactions,
};

#[derive(Default)]
pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListAccounts {
        ListAccounts::new()
    }
}

#[derive(Default)]
pub struct AnalyticsRepository;

impl AnalyticsRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn balances_overview(&self, query: RangeQuery) -> GetBalancesOverview {
        GetBalancesOverview::new(query)
    }
}

#[derive(Default)]
pub struct BudgetRepository;

impl BudgetRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListBudgets {
        ListBudgets
    }

    pub fn create(&self, category: impl Into<String>, amount: f64) -> CreateBudget {
        CreateBudget::new(category, amount)
    }

    pub fn update(
        &self,
        budget_id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
    ) -> UpdateBudget {
        UpdateBudget::new(budget_id, category, amount)
    }

    pub fn delete(&self, budget_id: impl Into<String>) -> DeleteBudget {
        DeleteBudget::new(budget_id)
    }
}

#[derive(Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self, query: RangeQuery) -> ListTransactions {
        ListTransactions::new().query(query)
    }
}
