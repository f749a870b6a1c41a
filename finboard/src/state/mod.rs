pub mod fetch;
pub mod reducer;
pub mod validators;

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::NaiveDate;
use ledger_api::endpoints::RangeQuery;

use crate::aggregation::{self, BudgetProgressEntry, BudgetStats};
use crate::chart::{self, NetPoint};
use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::error::DashboardError;
use crate::filters::TransactionFilter;
use crate::model::{Account, BalancesOverview, Budget, DateRange, Transaction};
use crate::optimistic::OptimisticList;
use crate::utils::dates;

pub use fetch::{FetchPhase, FetchPlan, FetchState};

/// Which accounts the dashboard is scoped to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSelection {
    selected: BTreeSet<String>,
    all: BTreeSet<String>,
}

impl AccountSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn all(&self) -> &BTreeSet<String> {
        &self.all
    }

    /// Swap in a freshly loaded account universe. A full selection stays full;
    /// otherwise only ids that still exist remain selected.
    pub fn replace_universe<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let was_all = self.is_all_selected();
        self.all = ids.into_iter().collect();
        if was_all {
            self.selected = self.all.clone();
        } else {
            self.selected.retain(|id| self.all.contains(id));
        }
    }

    pub fn is_all_selected(&self) -> bool {
        self.all.is_subset(&self.selected)
    }

    /// Accounts exist but none are selected: dependent views must not fetch
    pub fn blocks_fetch(&self) -> bool {
        !self.all.is_empty() && self.selected.is_empty()
    }

    /// Returns true when the selection changed
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.all.is_empty() && !self.all.contains(id) {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        true
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.selected != self.all;
        self.selected = self.all.clone();
        changed
    }

    pub fn select_none(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    pub fn set_selected<I>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        let selected: BTreeSet<String> = ids
            .into_iter()
            .filter(|id| self.all.is_empty() || self.all.contains(id))
            .collect();
        let changed = selected != self.selected;
        self.selected = selected;
        changed
    }

    /// `None` means every account, so no account filter is sent
    pub fn query_ids(&self) -> Option<Vec<String>> {
        if self.is_all_selected() {
            None
        } else {
            Some(self.selected.iter().cloned().collect())
        }
    }

    /// `all`, `none`, or the sorted ids joined by commas
    pub fn signature(&self) -> String {
        if self.is_all_selected() {
            "all".to_string()
        } else if self.selected.is_empty() {
            "none".to_string()
        } else {
            self.selected.iter().cloned().collect::<Vec<_>>().join(",")
        }
    }
}

/// Dedup key for a fetch: date range plus account scope
pub fn fetch_signature(range: &DateRange, accounts: &AccountSelection) -> String {
    format!("{}|{}", range.key(), accounts.signature())
}

pub fn range_query(range: &DateRange, accounts: &AccountSelection) -> RangeQuery {
    RangeQuery::new()
        .range(range.start, range.end)
        .account_ids(accounts.query_ids().unwrap_or_default())
}

/// What a view should present right now
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Loading,
    Refreshing,
    NoAccountsSelected,
    Failed(DashboardError),
    Ready,
}

pub fn view_status<T>(fetch: &FetchState<T>, accounts: &AccountSelection) -> ViewStatus {
    if accounts.blocks_fetch() {
        return ViewStatus::NoAccountsSelected;
    }
    match fetch.phase() {
        FetchPhase::Idle | FetchPhase::Loading => ViewStatus::Loading,
        FetchPhase::Refreshing => ViewStatus::Refreshing,
        FetchPhase::Ready => match fetch.error() {
            Some(error) => ViewStatus::Failed(error.clone()),
            None => ViewStatus::Ready,
        },
    }
}

/// 1-based page cursor over a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Pull the cursor back when the list shrank below it
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.clamp(1, self.page_count(total));
    }

    pub fn next(&mut self, total: usize) {
        if self.page < self.page_count(total) {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

#[derive(Debug, Clone)]
pub struct BudgetsView {
    /// First day of the month being viewed
    pub month: NaiveDate,
    pub budgets: OptimisticList<Budget>,
    /// The month's transactions, fetched alongside the budget list
    pub fetch: FetchState<Vec<Transaction>>,
    pub month_debouncer: Debouncer<NaiveDate>,
    pub mutation_error: Option<DashboardError>,
}

impl BudgetsView {
    pub fn new(month: NaiveDate, debounce: Duration) -> Self {
        Self {
            month: dates::first_of_month(month),
            budgets: OptimisticList::default(),
            fetch: FetchState::new(),
            month_debouncer: Debouncer::new(debounce),
            mutation_error: None,
        }
    }

    pub fn range(&self) -> DateRange {
        dates::month_range(self.month)
    }

    pub fn progress(&self) -> Vec<BudgetProgressEntry> {
        let transactions = self.fetch.data().map(Vec::as_slice).unwrap_or_default();
        aggregation::build_progress(self.budgets.items(), transactions, self.range())
    }

    pub fn stats(&self, today: NaiveDate) -> BudgetStats {
        aggregation::compute_stats(&self.progress(), self.month, today)
    }
}

#[derive(Debug, Clone)]
pub struct TransactionsView {
    pub fetch: FetchState<Vec<Transaction>>,
    /// Applied filters; `filter.search` holds the debounced text
    pub filter: TransactionFilter,
    /// Raw search box contents
    pub search_input: String,
    pub search_debouncer: Debouncer<String>,
    pub pagination: Pagination,
}

impl TransactionsView {
    pub fn new(page_size: usize, search_debounce: Duration) -> Self {
        Self {
            fetch: FetchState::new(),
            filter: TransactionFilter::default(),
            search_input: String::new(),
            search_debouncer: Debouncer::new(search_debounce),
            pagination: Pagination::new(page_size),
        }
    }

    pub fn filtered(&self) -> Vec<Transaction> {
        self.fetch
            .data()
            .map(|transactions| self.filter.apply(transactions))
            .unwrap_or_default()
    }

    pub fn page_items(&self) -> Vec<Transaction> {
        self.pagination.slice(&self.filtered()).to_vec()
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.filtered().len())
    }

    pub fn clamp_page(&mut self) {
        let total = self.filtered().len();
        self.pagination.clamp(total);
    }

    pub fn net_series(&self) -> Vec<NetPoint> {
        chart::daily_net_series(&self.filtered())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BalancesView {
    pub fetch: FetchState<BalancesOverview>,
}

/// Whole dashboard state, owned by the event loop
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub today: NaiveDate,
    pub accounts: AccountSelection,
    pub account_fetch: FetchState<Vec<Account>>,
    /// Range shared by the transactions and balances views
    pub date_range: DateRange,
    pub range_debouncer: Debouncer<DateRange>,
    pub budgets: BudgetsView,
    pub transactions: TransactionsView,
    pub balances: BalancesView,
    pub should_quit: bool,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_settings(today, &Settings::default())
    }

    pub fn with_settings(today: NaiveDate, settings: &Settings) -> Self {
        Self {
            today,
            accounts: AccountSelection::new(),
            account_fetch: FetchState::new(),
            date_range: dates::month_range(today),
            range_debouncer: Debouncer::new(settings.range_debounce()),
            budgets: BudgetsView::new(today, settings.range_debounce()),
            transactions: TransactionsView::new(settings.page_size, settings.search_debounce()),
            balances: BalancesView::default(),
            should_quit: false,
        }
    }

    pub fn account_list(&self) -> &[Account] {
        self.account_fetch.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn budgets_status(&self) -> ViewStatus {
        view_status(&self.budgets.fetch, &self.accounts)
    }

    pub fn transactions_status(&self) -> ViewStatus {
        view_status(&self.transactions.fetch, &self.accounts)
    }

    pub fn balances_status(&self) -> ViewStatus {
        view_status(&self.balances.fetch, &self.accounts)
    }

    pub fn has_pending_input(&self) -> bool {
        self.range_debouncer.is_pending()
            || self.budgets.month_debouncer.is_pending()
            || self.transactions.search_debouncer.is_pending()
    }

    /// No request, mutation or debounced input outstanding
    pub fn is_settled(&self) -> bool {
        !self.account_fetch.is_in_flight()
            && !self.budgets.fetch.is_in_flight()
            && !self.transactions.fetch.is_in_flight()
            && !self.balances.fetch.is_in_flight()
            && !self.budgets.budgets.has_pending()
            && !self.has_pending_input()
    }
}
