//! CLI command implementations.
//!
//! Each command drives one of the client boards and prints its banner. A
//! failed command prints the localized message and returns the underlying
//! error so the process exits non-zero.

pub mod auth;
pub mod ingredients;
pub mod recipes;

use posleep_client::ApiError;
use posleep_client::views::Notice;
use thiserror::Error;

use crate::render;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Request or validation failure; the banner has been printed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// The confirmation prompt was declined.
    #[error("Cancelled")]
    Cancelled,
}

/// Print the banner for `err` and hand the error back.
fn fail(err: ApiError, fallback: &str) -> CommandError {
    if let Err(e) = render::notice(&Notice::from_error(&err, fallback)) {
        return e.into();
    }
    if err.is_session_expired() {
        tracing::info!("Run `posleep login` to start a new session");
    }
    err.into()
}
