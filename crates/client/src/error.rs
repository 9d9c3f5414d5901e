//! Client error taxonomy.
//!
//! Transport failures, non-2xx statuses, forced logout (401/403) and
//! client-side validation each get their own variant. Controllers turn any of
//! them into a single [`crate::views::Notice`]; nothing is retried.

use posleep_core::{RecipeId, ValidationError};
use thiserror::Error;

/// Errors from the API client and the view controllers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// 401/403: the stored token was cleared and the user must log in again.
    #[error("로그인이 필요합니다. 다시 로그인해주세요.")]
    SessionExpired,

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Input rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login answered with a non-2xx status.
    #[error("아이디 또는 비밀번호를 확인하세요.")]
    LoginRejected,

    /// Signup answered with a non-2xx status; carries the server's text.
    #[error("{0}")]
    SignupRejected(String),

    /// Reading the token store or a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The same kind of request is already in flight.
    #[error("요청이 이미 진행 중이에요.")]
    Busy,

    /// Cook requested while some slot is still short.
    #[error("재료가 부족합니다!")]
    NotCookable(RecipeId),

    /// No row with the given id in the working set.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether the user has to log in again.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("recipe 12".to_string());
        assert_eq!(err.to_string(), "Not found: recipe 12");

        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err = ApiError::from(ValidationError::NameTooShort);
        assert_eq!(err.to_string(), "아이디는 3자 이상 입력해주세요.");
    }

    #[test]
    fn test_session_expired() {
        assert!(ApiError::SessionExpired.is_session_expired());
        assert!(!ApiError::Busy.is_session_expired());
        assert_eq!(
            ApiError::SessionExpired.to_string(),
            "로그인이 필요합니다. 다시 로그인해주세요."
        );
    }

    #[test]
    fn test_not_cookable_message() {
        assert_eq!(
            ApiError::NotCookable(RecipeId::new(3)).to_string(),
            "재료가 부족합니다!"
        );
    }
}
