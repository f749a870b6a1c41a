use std::time::Instant;

use uuid::Uuid;

use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::error::DashboardError;
use crate::events::{AppCommand, Effect, View};
use crate::model::Budget;
use crate::state::{fetch_signature, range_query, validators, DashboardState, FetchPlan};
use crate::utils::dates;

/// Apply a command and spawn background tasks for the effects it produces
pub fn execute_command(
    command: AppCommand,
    state: &mut DashboardState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
    now: Instant,
) {
    for effect in apply_command(command, state, now) {
        spawn_effect(effect, task_manager, data_loader);
    }
}

/// Run an effect in the background, superseding any task with the same key
pub fn spawn_effect(
    effect: Effect,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    let key = effect.task_key();
    let data_loader = data_loader.clone();
    task_manager.spawn_load_task(key, async move {
        data_loader.perform(effect).await;
    });
}

/// Pure state transition for a command. Returns the side effects to perform.
pub fn apply_command(command: AppCommand, state: &mut DashboardState, now: Instant) -> Vec<Effect> {
    match command {
        AppCommand::LoadAccounts => {
            match state
                .account_fetch
                .plan("accounts".to_string(), false, true)
            {
                FetchPlan::Fetch { generation } => {
                    tracing::info!("Loading accounts");
                    vec![Effect::LoadAccounts { generation }]
                }
                _ => vec![],
            }
        }

        AppCommand::SyncViews => plan_views(state, &View::ALL, false),

        AppCommand::Refresh => {
            tracing::info!("Refreshing all views");
            plan_views(state, &View::ALL, true)
        }

        AppCommand::RefreshView(view) => plan_views(state, &[view], true),

        AppCommand::ToggleAccount(account_id) => {
            let changed = state.accounts.toggle(&account_id);
            on_accounts_changed(state, changed)
        }

        AppCommand::SelectAllAccounts => {
            let changed = state.accounts.select_all();
            on_accounts_changed(state, changed)
        }

        AppCommand::SelectNoAccounts => {
            let changed = state.accounts.select_none();
            on_accounts_changed(state, changed)
        }

        AppCommand::SetSelectedAccounts(ids) => {
            let changed = state.accounts.set_selected(ids);
            on_accounts_changed(state, changed)
        }

        AppCommand::SetDateRange(range) => {
            let range = if range.start > range.end {
                crate::model::DateRange::new(range.end, range.start)
            } else {
                range
            };
            if range == state.date_range {
                // Typing back to the applied range disarms a pending change
                state.range_debouncer.cancel();
            } else {
                state.range_debouncer.schedule(range, now);
            }
            vec![]
        }

        AppCommand::SetBudgetMonth(month) => {
            schedule_month(state, dates::first_of_month(month), now);
            vec![]
        }

        AppCommand::NavigateBudgetMonth { forward } => {
            let month = dates::shift_month(state.budgets.month, if forward { 1 } else { -1 });
            schedule_month(state, month, now);
            vec![]
        }

        AppCommand::SetSearchText(text) => {
            state.transactions.search_input = text.clone();
            if text == state.transactions.filter.search {
                state.transactions.search_debouncer.cancel();
            } else {
                state.transactions.search_debouncer.schedule(text, now);
            }
            vec![]
        }

        AppCommand::SetCategoryFilter(category) => {
            let category = category.filter(|c| !c.trim().is_empty());
            if category != state.transactions.filter.category {
                state.transactions.filter.category = category;
                state.transactions.pagination.reset();
            }
            vec![]
        }

        AppCommand::NextPage => {
            let total = state.transactions.filtered().len();
            state.transactions.pagination.next(total);
            vec![]
        }

        AppCommand::PreviousPage => {
            state.transactions.pagination.previous();
            vec![]
        }

        AppCommand::CreateBudget { category, amount } => {
            let valid = match validators::validate_new_budget(
                &category,
                amount,
                state.budgets.budgets.items(),
            ) {
                Ok(valid) => valid,
                Err(error) => return reject_mutation(state, error),
            };

            let temp_id = format!("temp-{}", Uuid::new_v4());
            let temp = Budget {
                id: temp_id.clone(),
                category: valid.category.clone(),
                amount: valid.amount,
            };
            if let Err(error) = state.budgets.budgets.begin_create(temp) {
                return reject_mutation(state, error.into());
            }

            tracing::info!("Creating budget for {} ({})", valid.category, temp_id);
            state.budgets.mutation_error = None;
            vec![Effect::CreateBudget {
                temp_id,
                category: valid.category,
                amount: valid.amount,
            }]
        }

        AppCommand::UpdateBudget {
            budget_id,
            category,
            amount,
        } => {
            let valid = match validators::validate_budget_update(
                &budget_id,
                &category,
                amount,
                state.budgets.budgets.items(),
            ) {
                Ok(valid) => valid,
                Err(error) => return reject_mutation(state, error),
            };

            let (new_category, new_amount) = (valid.category.clone(), valid.amount);
            if let Err(error) = state.budgets.budgets.begin_update(&budget_id, |budget| {
                budget.category = new_category;
                budget.amount = new_amount;
            }) {
                return reject_mutation(state, error.into());
            }

            tracing::info!("Updating budget {}", budget_id);
            state.budgets.mutation_error = None;
            vec![Effect::UpdateBudget {
                budget_id,
                category: valid.category,
                amount: valid.amount,
            }]
        }

        AppCommand::DeleteBudget { budget_id } => {
            if let Err(error) = state.budgets.budgets.begin_delete(&budget_id) {
                return reject_mutation(state, error.into());
            }

            tracing::info!("Deleting budget {}", budget_id);
            state.budgets.mutation_error = None;
            vec![Effect::DeleteBudget { budget_id }]
        }

        AppCommand::DismissError => {
            state.budgets.mutation_error = None;
            vec![]
        }

        AppCommand::Tick => tick(state, now),

        AppCommand::Quit => {
            state.should_quit = true;
            vec![]
        }
    }
}

fn reject_mutation(state: &mut DashboardState, error: DashboardError) -> Vec<Effect> {
    tracing::warn!("Budget change rejected: {}", error);
    state.budgets.mutation_error = Some(error);
    vec![]
}

fn schedule_month(state: &mut DashboardState, month: chrono::NaiveDate, now: Instant) {
    if month == state.budgets.month {
        return;
    }
    // The label moves right away; the fetch waits for navigation to settle
    state.budgets.month = month;
    state.budgets.month_debouncer.schedule(month, now);
}

fn on_accounts_changed(state: &mut DashboardState, changed: bool) -> Vec<Effect> {
    if !changed {
        return vec![];
    }
    tracing::info!("Account filter changed: {}", state.accounts.signature());
    state.transactions.pagination.reset();
    plan_views(state, &View::ALL, false)
}

fn tick(state: &mut DashboardState, now: Instant) -> Vec<Effect> {
    let mut effects = Vec::new();

    if let Some(text) = state.transactions.search_debouncer.poll(now) {
        tracing::debug!("Applying search '{}'", text);
        state.transactions.filter.search = text;
        state.transactions.pagination.reset();
    }

    if let Some(range) = state.range_debouncer.poll(now) {
        if range != state.date_range {
            tracing::info!("Date range changed to {}", range.key());
            state.date_range = range;
            state.transactions.filter.date_range = Some(range);
            state.transactions.pagination.reset();
            effects.extend(plan_views(
                state,
                &[View::Transactions, View::Balances],
                false,
            ));
        }
    }

    if state.budgets.month_debouncer.poll(now).is_some() {
        tracing::info!("Budget month changed to {}", dates::month_label(state.budgets.month));
        effects.extend(plan_views(state, &[View::Budgets], false));
    }

    effects
}

/// Decide, per view, whether to skip, short-circuit or fetch
pub fn plan_views(state: &mut DashboardState, views: &[View], force: bool) -> Vec<Effect> {
    let blocked = state.accounts.blocks_fetch();
    let mut effects = Vec::new();

    for view in views {
        let range = match view {
            View::Budgets => state.budgets.range(),
            View::Transactions | View::Balances => state.date_range,
        };
        let signature = fetch_signature(&range, &state.accounts);
        let plan = match view {
            View::Budgets => state.budgets.fetch.plan(signature, blocked, force),
            View::Transactions => state.transactions.fetch.plan(signature, blocked, force),
            View::Balances => state.balances.fetch.plan(signature, blocked, force),
        };

        match plan {
            FetchPlan::Skip => {
                tracing::debug!("Skipping {} fetch, inputs unchanged", view.task_key());
            }
            FetchPlan::Empty => {
                tracing::info!("No accounts selected, cleared {}", view.task_key());
                if *view == View::Transactions {
                    state.transactions.pagination.reset();
                }
            }
            FetchPlan::Fetch { generation } => {
                let query = range_query(&range, &state.accounts);
                tracing::info!(
                    "Fetching {} (generation {}, {})",
                    view.task_key(),
                    generation,
                    range.key()
                );
                effects.push(match view {
                    View::Budgets => Effect::LoadBudgets { generation, query },
                    View::Transactions => Effect::LoadTransactions { generation, query },
                    View::Balances => Effect::LoadBalances { generation, query },
                });
            }
        }
    }

    effects
}
