//! Bearer token issued by `POST /auth/login`.
//!
//! The backend issues HS256 JWTs. The client never verifies the signature;
//! it only reads the `exp` claim so an obviously stale token is dropped
//! before it is sent.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// A login token and what could be read from its claims.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Raw token as sent in the `Authorization` header.
    pub token: SecretString,
    /// Login name (`sub` claim), if readable.
    pub subject: Option<String>,
    /// Unix timestamp of the `exp` claim, if readable.
    pub expires_at: Option<i64>,
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

impl SessionToken {
    /// Wrap a raw token, reading its claims when it is a JWT.
    ///
    /// Opaque tokens are accepted; they simply carry no expiry.
    #[must_use]
    pub fn parse(token: SecretString) -> Self {
        let claims = decode_claims(token.expose_secret());
        Self {
            subject: claims.as_ref().and_then(|c| c.sub.clone()),
            expires_at: claims.and_then(|c| c.exp),
            token,
        }
    }

    /// Whether `exp` is within `skew_secs` of `now` (or past it).
    #[must_use]
    pub fn is_expired_at(&self, now: i64, skew_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| now >= expires_at - skew_secs)
    }
}

fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    // Some issuers keep the padding; the URL-safe engine rejects it.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an unsigned JWT carrying `sub` and `exp`.
    pub(crate) fn jwt(sub: &str, exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({"sub": sub, "userId": 1, "exp": exp})
                .to_string()
                .as_bytes(),
        );
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_parse_reads_claims() {
        let token = SessionToken::parse(SecretString::from(jwt("sleepy", 1_900_000_000)));
        assert_eq!(token.subject.as_deref(), Some("sleepy"));
        assert_eq!(token.expires_at, Some(1_900_000_000));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let token = SessionToken::parse(SecretString::from("not-a-jwt"));
        assert_eq!(token.expires_at, None);
        assert!(!token.is_expired_at(i64::MAX, 60));
    }

    #[test]
    fn test_expiry_with_skew() {
        let token = SessionToken::parse(SecretString::from(jwt("sleepy", 1_000)));
        assert!(!token.is_expired_at(900, 60));
        // within the 60 second skew counts as expired
        assert!(token.is_expired_at(950, 60));
        assert!(token.is_expired_at(2_000, 60));
    }
}
