use super::DashboardState;
use crate::events::{AppCommand, DataEvent};

/// Pure state transition function for data events.
///
/// Returns follow-up commands for the caller to execute (e.g. planning the
/// views once the account universe is known).
pub fn reduce_data_event(state: &mut DashboardState, event: DataEvent) -> Vec<AppCommand> {
    match event {
        DataEvent::AccountsLoaded { generation, result } => {
            let ids = result
                .as_ref()
                .ok()
                .map(|accounts| accounts.iter().map(|a| a.id.clone()).collect::<Vec<_>>());
            if !state.account_fetch.complete(generation, result) {
                return vec![];
            }
            match ids {
                Some(ids) => {
                    tracing::info!("Loaded {} accounts", ids.len());
                    state.accounts.replace_universe(ids);
                }
                None => tracing::error!("Failed to load accounts, using every account"),
            }
            vec![AppCommand::SyncViews]
        }

        DataEvent::BudgetsLoaded { generation, result } => {
            if !state.budgets.fetch.is_current(generation) {
                tracing::debug!("Ignoring stale budgets response ({})", generation);
                return vec![];
            }
            let result = result.map(|(budgets, transactions)| {
                tracing::info!(
                    "Loaded {} budgets and {} transactions",
                    budgets.len(),
                    transactions.len()
                );
                state.budgets.budgets.replace_all(budgets);
                transactions
            });
            if let Err(error) = &result {
                tracing::error!("Failed to load budgets: {}", error);
            }
            state.budgets.fetch.complete(generation, result);
            vec![]
        }

        DataEvent::TransactionsLoaded { generation, result } => {
            if let Err(error) = &result {
                tracing::error!("Failed to load transactions: {}", error);
            }
            if state.transactions.fetch.complete(generation, result) {
                state.transactions.clamp_page();
            }
            vec![]
        }

        DataEvent::BalancesLoaded { generation, result } => {
            if let Err(error) = &result {
                tracing::error!("Failed to load balances: {}", error);
            }
            state.balances.fetch.complete(generation, result);
            vec![]
        }

        DataEvent::BudgetCreated { temp_id, budget } => {
            tracing::info!("Budget {} saved as {}", temp_id, budget.id);
            state.budgets.budgets.confirm_create(&temp_id, budget);
            vec![]
        }

        DataEvent::BudgetCreateFailed { temp_id, error } => {
            tracing::warn!("Failed to create budget {}: {}. Rolling back", temp_id, error);
            state.budgets.budgets.rollback(&temp_id);
            state.budgets.mutation_error = Some(error);
            vec![]
        }

        DataEvent::BudgetUpdated { budget_id, budget } => {
            tracing::info!("Budget {} updated", budget_id);
            state.budgets.budgets.confirm_update(&budget_id, budget);
            vec![]
        }

        DataEvent::BudgetUpdateFailed { budget_id, error } => {
            tracing::warn!("Failed to update budget {}: {}. Rolling back", budget_id, error);
            state.budgets.budgets.rollback(&budget_id);
            state.budgets.mutation_error = Some(error);
            vec![]
        }

        DataEvent::BudgetDeleted { budget_id } => {
            tracing::info!("Budget {} deleted", budget_id);
            state.budgets.budgets.confirm_delete(&budget_id);
            vec![]
        }

        DataEvent::BudgetDeleteFailed { budget_id, error } => {
            tracing::warn!("Failed to delete budget {}: {}. Rolling back", budget_id, error);
            state.budgets.budgets.rollback(&budget_id);
            state.budgets.mutation_error = Some(error);
            vec![]
        }
    }
}
