use std::fmt::Write;

use crate::category::{format_category_name, tag_theme_for_category};
use crate::chart;
use crate::state::{DashboardState, ViewStatus};
use crate::utils::dates;

fn status_line(status: &ViewStatus) -> Option<String> {
    match status {
        ViewStatus::Ready => None,
        ViewStatus::Loading => Some("  loading...".to_string()),
        ViewStatus::Refreshing => Some("  refreshing...".to_string()),
        ViewStatus::NoAccountsSelected => Some("  No accounts selected.".to_string()),
        ViewStatus::Failed(error) => Some(format!("  {}", error)),
    }
}

/// Plain-text rendering of the whole dashboard
pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, state);
    out
}

fn write_report(out: &mut String, state: &DashboardState) -> std::fmt::Result {
    writeln!(
        out,
        "Accounts: {} of {} selected",
        if state.accounts.is_all_selected() {
            state.accounts.all().len()
        } else {
            state.accounts.selected().len()
        },
        state.accounts.all().len()
    )?;
    if let Some(error) = state.account_fetch.error() {
        writeln!(out, "  {}", error)?;
    }

    // Budgets
    writeln!(out)?;
    writeln!(out, "Budgets for {}", dates::month_label(state.budgets.month))?;
    if let Some(line) = status_line(&state.budgets_status()) {
        writeln!(out, "{}", line)?;
    }
    if let Some(error) = &state.budgets.mutation_error {
        writeln!(out, "  ! {}", error)?;
    }
    for entry in state.budgets.progress() {
        let theme = tag_theme_for_category(&entry.budget.category);
        writeln!(
            out,
            "  {:<24} {:>10.2} / {:>10.2}  {:>5.1}%{} [{}]",
            entry.display_name(),
            entry.spent,
            entry.budget.amount,
            entry.percentage,
            if entry.is_over_budget() { "  OVER" } else { "" },
            theme.background
        )?;
    }
    let stats = state.budgets.stats(state.today);
    writeln!(
        out,
        "  Budgeted {:.2}, spent {:.2}, variance {:.2}; {} of {} days left",
        stats.total_budgeted,
        stats.total_spent,
        stats.variance,
        stats.days_remaining,
        stats.total_days
    )?;
    if !stats.over_budget_categories.is_empty() {
        writeln!(out, "  Over budget: {}", stats.over_budget_categories.join(", "))?;
    }
    if !stats.near_limit_categories.is_empty() {
        writeln!(out, "  Near limit: {}", stats.near_limit_categories.join(", "))?;
    }

    // Balances
    writeln!(out)?;
    writeln!(out, "Balances")?;
    if let Some(line) = status_line(&state.balances_status()) {
        writeln!(out, "{}", line)?;
    }
    if let Some(overview) = state.balances.fetch.data() {
        for account in &overview.accounts {
            writeln!(
                out,
                "  {:<24} {:>12.2}",
                account.name, account.current_balance
            )?;
        }
        writeln!(
            out,
            "  Assets {:.2}, liabilities {:.2}, net worth {:.2}",
            overview.total_assets, overview.total_liabilities, overview.net_worth
        )?;
    }

    // Transactions
    let view = &state.transactions;
    writeln!(out)?;
    writeln!(
        out,
        "Transactions {} (page {} of {})",
        state.date_range.key(),
        view.pagination.page(),
        view.page_count()
    )?;
    if let Some(line) = status_line(&state.transactions_status()) {
        writeln!(out, "{}", line)?;
    }
    for txn in view.page_items() {
        writeln!(
            out,
            "  {}  {:<28} {:>10.2}  {}",
            txn.date.format("%Y-%m-%d"),
            txn.name,
            txn.amount,
            format_category_name(Some(&txn.category.primary))
        )?;
    }

    let series: Vec<f64> = view.net_series().iter().map(|p| p.net).collect();
    if let Some((lo, hi)) = chart::calculate_net_y_axis_domain(&series) {
        writeln!(
            out,
            "  Net flow axis {:.2}..{:.2}, {} marker(s)",
            lo,
            hi,
            chart::calculate_net_dot_indices(&series).len()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::state::FetchPlan;
    use crate::testing::fixtures;

    #[test]
    fn renders_progress_and_balances() {
        let mut state = DashboardState::new(fixtures::date("2024-01-15"));
        state
            .budgets
            .budgets
            .replace_all(vec![fixtures::budget("b1", "GROCERIES", 200.0)]);
        let FetchPlan::Fetch { generation } = state.budgets.fetch.plan("x".into(), false, false)
        else {
            panic!("expected fetch");
        };
        state.budgets.fetch.complete(
            generation,
            Ok(vec![fixtures::transaction("t1", "2024-01-04", "GROCERIES", 150.0)]),
        );

        let report = render(&state);
        assert!(report.contains("Budgets for January 2024"));
        assert!(report.contains("Groceries"));
        assert!(report.contains("75.0%"));
        assert!(report.contains("16 of 31 days left"));
    }

    #[test]
    fn unspent_budget_renders_positive_zero() {
        let mut state = DashboardState::new(fixtures::date("2024-01-15"));
        state
            .budgets
            .budgets
            .replace_all(vec![fixtures::budget("b1", "GROCERIES", 200.0)]);
        let FetchPlan::Fetch { generation } = state.budgets.fetch.plan("x".into(), false, false)
        else {
            panic!("expected fetch");
        };
        state.budgets.fetch.complete(generation, Ok(Vec::new()));

        let report = render(&state);
        assert!(!report.contains("-0.0"), "signed zero in:\n{}", report);
        assert!(report.contains("0.0%"));
        assert!(report.contains("spent 0.00"));
    }

    #[test]
    fn renders_failures_and_empty_selection() {
        let mut state = DashboardState::new(fixtures::date("2024-01-15"));
        state.budgets.mutation_error = Some(DashboardError::failed("create budget"));
        state
            .accounts
            .replace_universe(["a".to_string(), "b".to_string()]);
        state.accounts.select_none();

        let report = render(&state);
        assert!(report.contains("! Failed to create budget."));
        assert!(report.contains("No accounts selected."));
        assert!(report.contains("Accounts: 0 of 2 selected"));
    }
}
