use crate::category::CategoryKey;
use crate::error::DashboardError;
use crate::model::Budget;

/// A budget input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBudget {
    pub category: String,
    pub amount: f64,
}

/// Validate a new budget against the budgets already on screen.
///
/// Catches duplicates locally so no request is made; the server's 409 remains
/// the backstop for categories created elsewhere.
pub fn validate_new_budget(
    category: &str,
    amount: f64,
    existing: &[Budget],
) -> Result<ValidBudget, DashboardError> {
    validate_budget(None, category, amount, existing)
}

/// Same as [`validate_new_budget`], ignoring the budget being edited
pub fn validate_budget_update(
    budget_id: &str,
    category: &str,
    amount: f64,
    existing: &[Budget],
) -> Result<ValidBudget, DashboardError> {
    validate_budget(Some(budget_id), category, amount, existing)
}

fn validate_budget(
    budget_id: Option<&str>,
    category: &str,
    amount: f64,
    existing: &[Budget],
) -> Result<ValidBudget, DashboardError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(DashboardError::Validation(
            "Category is required.".to_string(),
        ));
    }

    validate_amount(amount)?;

    let key = CategoryKey::new(category);
    let duplicate = existing
        .iter()
        .filter(|budget| Some(budget.id.as_str()) != budget_id)
        .any(|budget| key.matches(&budget.category));
    if duplicate {
        return Err(DashboardError::DuplicateCategory(key.display_name().to_string()));
    }

    Ok(ValidBudget {
        category: category.to_string(),
        amount,
    })
}

pub fn validate_amount(amount: f64) -> Result<f64, DashboardError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DashboardError::Validation(
            "Amount must be a non-negative number.".to_string(),
        ));
    }
    Ok(amount)
}
