//! Authentication context.
//!
//! The token is passed around explicitly as an [`AuthContext`] instead of
//! being read from ambient storage by each call. The context owns the
//! [`TokenStore`] and the [`ExpiryPolicy`] that decides when a saved token is
//! no longer worth sending.

mod store;
mod token;

pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
pub use token::SessionToken;

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info};

use crate::error::ApiError;

/// When a stored token is treated as expired on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Read the JWT `exp` claim; expired once `now >= exp - skew_secs`.
    JwtExp { skew_secs: i64 },
    /// Never expire locally; only a 401/403 ends the session.
    Never,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::JwtExp { skew_secs: 60 }
    }
}

impl ExpiryPolicy {
    /// Whether `token` should be dropped at unix time `now`.
    #[must_use]
    pub fn is_expired(self, token: &SessionToken, now: i64) -> bool {
        match self {
            Self::JwtExp { skew_secs } => token.is_expired_at(now, skew_secs),
            Self::Never => false,
        }
    }
}

/// Bearer token access shared by the API client.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
    policy: ExpiryPolicy,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("store", &"[REDACTED]")
            .field("policy", &self.policy)
            .finish()
    }
}

impl AuthContext {
    /// Create a context over `store` with the default expiry policy.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            policy: ExpiryPolicy::default(),
        }
    }

    /// In-memory context, mostly for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    /// Replace the expiry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active expiry policy.
    #[must_use]
    pub const fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Token to send as `Authorization: Bearer`, if any.
    ///
    /// A token the policy considers expired is cleared and not returned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be read or cleared.
    pub fn bearer(&self) -> Result<Option<SecretString>, ApiError> {
        let Some(raw) = self.store.load()? else {
            return Ok(None);
        };
        let token = SessionToken::parse(raw);
        if self
            .policy
            .is_expired(&token, chrono::Utc::now().timestamp())
        {
            debug!(subject = ?token.subject, "Dropping expired login token");
            self.store.clear()?;
            return Ok(None);
        }
        Ok(Some(token.token))
    }

    /// Whether a usable token is present.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be read.
    pub fn is_logged_in(&self) -> Result<bool, ApiError> {
        Ok(self.bearer()?.is_some())
    }

    /// Login name from the saved token, when it is a readable JWT.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be read.
    pub fn subject(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .bearer()?
            .and_then(|token| SessionToken::parse(token).subject))
    }

    /// Persist a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be written.
    pub fn store_token(&self, token: &SecretString) -> Result<(), ApiError> {
        self.store.save(token)?;
        Ok(())
    }

    /// Drop the token after the backend rejected it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be cleared.
    pub fn invalidate(&self) -> Result<(), ApiError> {
        info!("Backend rejected the session, clearing login token");
        self.store.clear()?;
        Ok(())
    }

    /// Explicit logout. The backend has no logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        Ok(())
    }
}
