use chrono::NaiveDate;
use ledger_api::endpoints::RangeQuery;

use crate::error::DashboardError;
use crate::model::{Account, BalancesOverview, Budget, DateRange, Transaction};

/// Dashboard panels backed by a remote fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Budgets,
    Transactions,
    Balances,
}

impl View {
    pub const ALL: [View; 3] = [View::Budgets, View::Transactions, View::Balances];

    pub fn task_key(self) -> &'static str {
        match self {
            View::Budgets => "budgets",
            View::Transactions => "transactions",
            View::Balances => "balances",
        }
    }
}

/// Commands to execute (user actions and timer ticks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Data loading
    LoadAccounts,
    /// Re-plan every view; unchanged signatures are skipped
    SyncViews,
    /// Refetch every view even when nothing changed
    Refresh,
    RefreshView(View),

    // Account filter (applied immediately)
    ToggleAccount(String),
    SelectAllAccounts,
    SelectNoAccounts,
    SetSelectedAccounts(Vec<String>),

    // Debounced inputs
    SetDateRange(DateRange),
    SetBudgetMonth(NaiveDate),
    NavigateBudgetMonth {
        forward: bool,
    },
    SetSearchText(String),

    // Local-only filters
    SetCategoryFilter(Option<String>),
    NextPage,
    PreviousPage,

    // Budget mutations
    CreateBudget {
        category: String,
        amount: f64,
    },
    UpdateBudget {
        budget_id: String,
        category: String,
        amount: f64,
    },
    DeleteBudget {
        budget_id: String,
    },
    DismissError,

    /// Drive debouncers
    Tick,

    // System
    Quit,
}

/// Side effects requested by the executor, performed by background tasks
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadAccounts {
        generation: u64,
    },
    LoadBudgets {
        generation: u64,
        query: RangeQuery,
    },
    LoadTransactions {
        generation: u64,
        query: RangeQuery,
    },
    LoadBalances {
        generation: u64,
        query: RangeQuery,
    },
    CreateBudget {
        temp_id: String,
        category: String,
        amount: f64,
    },
    UpdateBudget {
        budget_id: String,
        category: String,
        amount: f64,
    },
    DeleteBudget {
        budget_id: String,
    },
}

impl Effect {
    /// Tasks sharing a key supersede each other
    pub fn task_key(&self) -> String {
        match self {
            Effect::LoadAccounts { .. } => "accounts".to_string(),
            Effect::LoadBudgets { .. } => View::Budgets.task_key().to_string(),
            Effect::LoadTransactions { .. } => View::Transactions.task_key().to_string(),
            Effect::LoadBalances { .. } => View::Balances.task_key().to_string(),
            Effect::CreateBudget { temp_id, .. } => format!("budget:{}", temp_id),
            Effect::UpdateBudget { budget_id, .. } | Effect::DeleteBudget { budget_id } => {
                format!("budget:{}", budget_id)
            }
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(
            self,
            Effect::LoadAccounts { .. }
                | Effect::LoadBudgets { .. }
                | Effect::LoadTransactions { .. }
                | Effect::LoadBalances { .. }
        )
    }
}

/// Events from background tasks (responses to effects)
#[derive(Debug, Clone)]
pub enum DataEvent {
    AccountsLoaded {
        generation: u64,
        result: Result<Vec<Account>, DashboardError>,
    },
    BudgetsLoaded {
        generation: u64,
        result: Result<(Vec<Budget>, Vec<Transaction>), DashboardError>,
    },
    TransactionsLoaded {
        generation: u64,
        result: Result<Vec<Transaction>, DashboardError>,
    },
    BalancesLoaded {
        generation: u64,
        result: Result<BalancesOverview, DashboardError>,
    },

    // Budget mutations
    BudgetCreated {
        temp_id: String,
        budget: Budget,
    },
    BudgetCreateFailed {
        temp_id: String,
        error: DashboardError,
    },
    BudgetUpdated {
        budget_id: String,
        budget: Budget,
    },
    BudgetUpdateFailed {
        budget_id: String,
        error: DashboardError,
    },
    BudgetDeleted {
        budget_id: String,
    },
    BudgetDeleteFailed {
        budget_id: String,
        error: DashboardError,
    },
}
