use serde::Deserialize;
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum LedgerApiError {
    /// The gateway answered with a non-success status
    Api(StatusCode, String),
    /// The request never produced a usable response (connection, decoding, ...)
    Internal(ApiError),
}

impl LedgerApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            LedgerApiError::Api(status, _) => Some(*status),
            LedgerApiError::Internal(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }
}

impl From<ApiError> for LedgerApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                LedgerApiError::Api(status, extract_message(&detail))
            }
            e => LedgerApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for LedgerApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerApiError::Internal(e) => write!(f, "Internal error: {}", e),
            LedgerApiError::Api(status, message) if message.is_empty() => {
                write!(f, "({})", status)
            }
            LedgerApiError::Api(status, message) => write!(f, "({}) {}", status, message),
        }
    }
}

impl std::error::Error for LedgerApiError {}

/// Error bodies are not uniform across gateway routes
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.message)
            .or(parsed.detail)
            .unwrap_or_else(|| body.trim().to_string()),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_prefers_error_field() {
        assert_eq!(
            extract_message(r#"{"error": "Budget already exists", "message": "ignored"}"#),
            "Budget already exists"
        );
        assert_eq!(
            extract_message(r#"{"message": "Token expired"}"#),
            "Token expired"
        );
    }

    #[test]
    fn extract_message_falls_back_to_raw_body() {
        assert_eq!(extract_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(extract_message(r#"{"status": 500}"#), r#"{"status": 500}"#);
    }

    #[test]
    fn status_helpers() {
        let err = LedgerApiError::Api(StatusCode::UNAUTHORIZED, "nope".to_string());
        assert!(err.is_unauthorized());
        assert!(!err.is_conflict());

        let err = LedgerApiError::Api(StatusCode::CONFLICT, String::new());
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "(409 Conflict)");

        let err = LedgerApiError::Api(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert!(err.is_server_error());
    }
}
