use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use ledger_api::{endpoints::RangeQuery, LedgerApiError, StatusCode};

use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent, Effect};
use crate::gateway::LedgerGateway;
use crate::model::{Account, AccountBalance, BalancesOverview, Budget, Transaction};
use crate::state::DashboardState;

/// Handler that records effects instead of spawning tasks
#[derive(Default)]
pub struct MockDataHandler {
    pub effects: Vec<Effect>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut DashboardState, now: Instant) {
        let effects = executor::apply_command(command, state, now);
        self.effects.extend(effects);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    /// Dashboard with `today` pinned to 2024-01-15
    pub fn new() -> Self {
        Self::with_today(fixtures::date("2024-01-15"))
    }

    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            core: AppCore::new(DashboardState::new(today), MockDataHandler::new()),
        }
    }

    pub fn send(&mut self, command: AppCommand) {
        self.core.handle_command(command);
    }

    pub fn send_at(&mut self, command: AppCommand, now: Instant) {
        self.core.handle_command_at(command, now);
    }

    /// Inject a data event (simulate a gateway response)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    pub fn state(&self) -> &DashboardState {
        self.core.state()
    }

    /// Effects recorded so far, oldest first
    pub fn effects(&self) -> &[Effect] {
        &self.core.handler().effects
    }

    /// Drain recorded effects
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.core.handler_mut().effects)
    }

    /// Load the given accounts the way the event loop would
    pub fn load_accounts(&mut self, accounts: Vec<Account>) {
        self.send(AppCommand::LoadAccounts);
        let generation = self.state().account_fetch.generation();
        self.send_data_event(DataEvent::AccountsLoaded {
            generation,
            result: Ok(accounts),
        });
    }

    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory gateway that counts calls and can be scripted to fail
#[derive(Default)]
pub struct MockGateway {
    accounts: Mutex<Vec<Account>>,
    budgets: Mutex<Vec<Budget>>,
    transactions: Mutex<Vec<Transaction>>,
    balances: Mutex<Vec<AccountBalance>>,
    failures: Mutex<HashMap<&'static str, StatusCode>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(self, accounts: Vec<Account>) -> Self {
        *lock(&self.accounts) = accounts;
        self
    }

    pub fn with_budgets(self, budgets: Vec<Budget>) -> Self {
        *lock(&self.budgets) = budgets;
        self
    }

    pub fn with_transactions(self, transactions: Vec<Transaction>) -> Self {
        *lock(&self.transactions) = transactions;
        self
    }

    pub fn with_balances(self, balances: Vec<AccountBalance>) -> Self {
        *lock(&self.balances) = balances;
        self
    }

    /// Make every call to `method` fail with `status`
    pub fn fail(&self, method: &'static str, status: StatusCode) {
        lock(&self.failures).insert(method, status);
    }

    pub fn calls(&self, method: &str) -> usize {
        lock(&self.calls).iter().filter(|m| **m == method).count()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn budgets(&self) -> Vec<Budget> {
        lock(&self.budgets).clone()
    }

    fn record(&self, method: &'static str) -> Result<(), LedgerApiError> {
        lock(&self.calls).push(method);
        match lock(&self.failures).get(method) {
            Some(status) => Err(LedgerApiError::Api(*status, "scripted failure".to_string())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LedgerGateway for MockGateway {
    async fn list_accounts(&self) -> Result<Vec<Account>, LedgerApiError> {
        self.record("list_accounts")?;
        Ok(lock(&self.accounts).clone())
    }

    async fn list_transactions(&self, query: &RangeQuery) -> Result<Vec<Transaction>, LedgerApiError> {
        self.record("list_transactions")?;
        let in_range = |date: NaiveDate| {
            query.start_date.is_none_or(|start| date >= start)
                && query.end_date.is_none_or(|end| date <= end)
        };
        Ok(lock(&self.transactions)
            .iter()
            .filter(|txn| in_range(txn.date))
            .cloned()
            .collect())
    }

    async fn list_budgets(&self) -> Result<Vec<Budget>, LedgerApiError> {
        self.record("list_budgets")?;
        Ok(lock(&self.budgets).clone())
    }

    async fn create_budget(&self, category: &str, amount: f64) -> Result<Budget, LedgerApiError> {
        self.record("create_budget")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let budget = Budget {
            id: format!("budget-{}", id),
            category: category.to_string(),
            amount,
        };
        lock(&self.budgets).push(budget.clone());
        Ok(budget)
    }

    async fn update_budget(
        &self,
        budget_id: &str,
        category: &str,
        amount: f64,
    ) -> Result<Budget, LedgerApiError> {
        self.record("update_budget")?;
        let mut budgets = lock(&self.budgets);
        let budget = budgets
            .iter_mut()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| LedgerApiError::Api(StatusCode::NOT_FOUND, "not found".to_string()))?;
        budget.category = category.to_string();
        budget.amount = amount;
        Ok(budget.clone())
    }

    async fn delete_budget(&self, budget_id: &str) -> Result<(), LedgerApiError> {
        self.record("delete_budget")?;
        lock(&self.budgets).retain(|b| b.id != budget_id);
        Ok(())
    }

    async fn balances_overview(&self, _query: &RangeQuery) -> Result<BalancesOverview, LedgerApiError> {
        self.record("balances_overview")?;
        Ok(BalancesOverview::from_accounts(lock(&self.balances).clone()))
    }
}

/// Builders for test data
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::model::{Account, AccountBalance, Budget, Transaction, TransactionCategory};

    /// Parse `YYYY-MM-DD`; panics on bad input
    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| panic!("bad test date {}", s))
    }

    pub fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {}", id),
            account_type: "depository".to_string(),
            mask: Some("0000".to_string()),
        }
    }

    pub fn budget(id: &str, category: &str, amount: f64) -> Budget {
        Budget {
            id: id.to_string(),
            category: category.to_string(),
            amount,
        }
    }

    pub fn transaction(id: &str, day: &str, category: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: date(day),
            name: format!("Merchant {}", id),
            merchant: Some(format!("Merchant {}", id)),
            amount,
            category: TransactionCategory {
                primary: category.to_string(),
                detailed: None,
                confidence: None,
            },
            account_name: "Checking".to_string(),
            account_type: "depository".to_string(),
            account_mask: Some("0000".to_string()),
            running_balance: None,
        }
    }

    pub fn balance(id: &str, account_type: &str, current: f64) -> AccountBalance {
        AccountBalance {
            account_id: id.to_string(),
            name: format!("Account {}", id),
            account_type: account_type.to_string(),
            current_balance: current,
            available_balance: None,
        }
    }
}
