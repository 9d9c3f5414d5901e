//! Wire envelopes shared by several endpoints.

use serde::{Deserialize, Serialize};

/// Standard response wrapper of the list/get endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `"success"` on the happy path.
    pub status: String,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
}

impl<T> ApiEnvelope<T> {
    /// Wrap `data` in a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
            meta: None,
        }
    }
}

/// Response of `POST /recipes/flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedCount {
    pub changed: i64,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
