use chrono::{Datelike, NaiveDate};

use crate::category::{format_category_name, CategoryKey};
use crate::model::{Budget, DateRange, Transaction};
use crate::utils::dates;

/// Near-limit threshold, in percent of the planned amount
const NEAR_LIMIT_THRESHOLD: f64 = 80.0;
const NEAR_LIMIT_MAX: usize = 3;

/// Signed sum of the transactions in `category_id` within `range`.
///
/// Categories match by raw code (case-insensitive) or by formatted display name.
pub fn calculate_spent(transactions: &[Transaction], category_id: &str, range: DateRange) -> f64 {
    let key = CategoryKey::new(category_id);
    transactions
        .iter()
        .filter(|txn| range.contains(txn.date))
        .filter(|txn| key.matches(&txn.category.primary))
        .fold(0.0, |total, txn| total + txn.amount)
}

pub fn calculate_percentage(amount: f64, spent: f64) -> f64 {
    if amount == 0.0 {
        return 0.0;
    }
    (spent / amount * 100.0).clamp(0.0, 100.0)
}

pub fn calculate_remaining(amount: f64, spent: f64) -> f64 {
    (amount - spent).max(0.0)
}

pub fn is_over_budget(amount: f64, spent: f64) -> bool {
    spent > amount
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgressEntry {
    pub budget: Budget,
    /// Never negative; refund-heavy months floor at zero
    pub spent: f64,
    pub percentage: f64,
}

impl BudgetProgressEntry {
    pub fn new(budget: Budget, spent: f64) -> Self {
        // Also folds a signed zero into +0
        let spent = if spent > 0.0 { spent } else { 0.0 };
        Self {
            percentage: calculate_percentage(budget.amount, spent),
            budget,
            spent,
        }
    }

    pub fn remaining(&self) -> f64 {
        calculate_remaining(self.budget.amount, self.spent)
    }

    pub fn is_over_budget(&self) -> bool {
        is_over_budget(self.budget.amount, self.spent)
    }

    /// Unclamped spent/planned ratio in percent, `None` for a zero budget
    pub fn utilization(&self) -> Option<f64> {
        (self.budget.amount > 0.0).then(|| self.spent / self.budget.amount * 100.0)
    }

    pub fn display_name(&self) -> String {
        format_category_name(Some(&self.budget.category))
    }
}

/// One progress entry per budget, in input order
pub fn build_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
    range: DateRange,
) -> Vec<BudgetProgressEntry> {
    budgets
        .iter()
        .map(|budget| {
            let spent = calculate_spent(transactions, &budget.category, range);
            BudgetProgressEntry::new(budget.clone(), spent)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetStats {
    pub total_budgeted: f64,
    pub total_spent: f64,
    /// Budgeted minus spent; negative when the month is overspent overall
    pub variance: f64,
    pub over_budget_count: usize,
    pub over_budget_categories: Vec<String>,
    pub active_budget_categories: Vec<String>,
    pub near_limit_categories: Vec<String>,
    pub total_days: u32,
    pub days_remaining: u32,
}

/// Month-level summary of `entries`. `reference_month` may be any day in the
/// month; `today` decides whether that month is past, current or future.
pub fn compute_stats(
    entries: &[BudgetProgressEntry],
    reference_month: NaiveDate,
    today: NaiveDate,
) -> BudgetStats {
    let total_budgeted = entries.iter().fold(0.0, |total, e| total + e.budget.amount);
    let total_spent = entries.iter().fold(0.0, |total, e| total + e.spent);

    let over_budget_categories: Vec<String> = entries
        .iter()
        .filter(|e| e.is_over_budget())
        .map(BudgetProgressEntry::display_name)
        .collect();

    let near_limit_categories = entries
        .iter()
        .filter(|e| {
            e.utilization()
                .is_some_and(|u| (NEAR_LIMIT_THRESHOLD..=100.0).contains(&u))
        })
        .take(NEAR_LIMIT_MAX)
        .map(BudgetProgressEntry::display_name)
        .collect();

    let total_days = dates::days_in_month(reference_month);
    let days_remaining = match dates::month_key(reference_month).cmp(&dates::month_key(today)) {
        std::cmp::Ordering::Less => 0,
        std::cmp::Ordering::Greater => total_days,
        std::cmp::Ordering::Equal => total_days.saturating_sub(today.day()),
    };

    BudgetStats {
        total_budgeted,
        total_spent,
        variance: total_budgeted - total_spent,
        over_budget_count: over_budget_categories.len(),
        over_budget_categories,
        active_budget_categories: entries.iter().map(BudgetProgressEntry::display_name).collect(),
        near_limit_categories,
        total_days,
        days_remaining,
    }
}
