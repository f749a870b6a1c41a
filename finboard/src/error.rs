use ledger_api::LedgerApiError;
use thiserror::Error;

use crate::optimistic::MutationError;

pub const NOT_AUTHENTICATED_MESSAGE: &str = "You are not logged in. Please log in again.";

/// Errors surfaced to the dashboard. Cloneable so they can live in view state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("You are not logged in. Please log in again.")]
    NotAuthenticated,

    #[error("A budget for {0} already exists.")]
    DuplicateCategory(String),

    #[error("{0}")]
    Validation(String),

    #[error("Another change to this budget is still saving ({0}).")]
    MutationInFlight(String),

    #[error("{0}")]
    Failed(String),
}

/// Coarse classification used for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    Conflict,
    Validation,
    Network,
    Server,
    Unknown,
}

impl DashboardError {
    /// Classify a gateway failure. `action` completes "Failed to ...", e.g.
    /// `"create budget"`.
    pub fn from_api(err: &LedgerApiError, action: &str) -> Self {
        if err.is_unauthorized() {
            DashboardError::NotAuthenticated
        } else {
            DashboardError::failed(action)
        }
    }

    /// Same as [`DashboardError::from_api`], but a 409 names the duplicated category
    pub fn from_api_for_category(err: &LedgerApiError, action: &str, category: &str) -> Self {
        if err.is_conflict() {
            DashboardError::DuplicateCategory(crate::category::format_category_name(Some(category)))
        } else {
            Self::from_api(err, action)
        }
    }

    pub fn failed(action: &str) -> Self {
        DashboardError::Failed(format!("Failed to {}.", action))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::NotAuthenticated => ErrorKind::Auth,
            DashboardError::DuplicateCategory(_) | DashboardError::MutationInFlight(_) => {
                ErrorKind::Conflict
            }
            DashboardError::Validation(_) => ErrorKind::Validation,
            DashboardError::Failed(_) => ErrorKind::Server,
        }
    }
}

impl From<MutationError> for DashboardError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::InFlight(id) => DashboardError::MutationInFlight(id),
            MutationError::NotFound(id) => {
                DashboardError::Validation(format!("Budget {} no longer exists.", id))
            }
        }
    }
}

/// Classify a raw gateway error without an action context
pub fn api_error_kind(err: &LedgerApiError) -> ErrorKind {
    if err.is_unauthorized() {
        ErrorKind::Auth
    } else if err.is_conflict() {
        ErrorKind::Conflict
    } else if err.is_server_error() {
        ErrorKind::Server
    } else if err.status().is_none() {
        ErrorKind::Network
    } else {
        ErrorKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_api::StatusCode;

    fn api(status: StatusCode) -> LedgerApiError {
        LedgerApiError::Api(status, "boom".to_string())
    }

    #[test]
    fn unauthorized_maps_to_login_message() {
        let err = DashboardError::from_api(&api(StatusCode::UNAUTHORIZED), "load budgets");
        assert_eq!(err, DashboardError::NotAuthenticated);
        assert_eq!(err.to_string(), NOT_AUTHENTICATED_MESSAGE);
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn server_errors_get_generic_message() {
        let err = DashboardError::from_api(&api(StatusCode::INTERNAL_SERVER_ERROR), "create budget");
        assert_eq!(err.to_string(), "Failed to create budget.");
    }

    #[test]
    fn conflict_names_category() {
        let err = DashboardError::from_api_for_category(
            &api(StatusCode::CONFLICT),
            "create budget",
            "FOOD_AND_DRINK",
        );
        assert_eq!(err, DashboardError::DuplicateCategory("Food And Drink".to_string()));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn validation_has_its_own_kind() {
        let err = DashboardError::Validation("Category is required.".to_string());
        assert_eq!(err.kind(), ErrorKind::Validation);

        let missing: DashboardError = MutationError::NotFound("b9".to_string()).into();
        assert_eq!(missing.kind(), ErrorKind::Validation);
        assert_eq!(DashboardError::failed("load budgets").kind(), ErrorKind::Server);
    }

    #[test]
    fn raw_error_kinds() {
        assert_eq!(api_error_kind(&api(StatusCode::BAD_GATEWAY)), ErrorKind::Server);
        assert_eq!(api_error_kind(&api(StatusCode::NOT_FOUND)), ErrorKind::Unknown);
        assert_eq!(api_error_kind(&api(StatusCode::UNAUTHORIZED)), ErrorKind::Auth);
    }
}
