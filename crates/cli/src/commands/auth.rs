//! Login, signup and logout.

use std::io::Write;

use posleep_client::ApiClient;
use posleep_client::views::Notice;
use posleep_client::views::notice::{LOGGED_OUT, SERVER_UNREACHABLE};
use posleep_core::{Credentials, SignupRequest};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::{CommandError, fail};
use crate::render;

/// Validate the form, log in and save the token.
///
/// # Errors
///
/// Returns `CommandError::Api` if validation or the login request fails.
pub async fn login(api: &ApiClient, name: &str, password: &SecretString) -> Result<(), CommandError> {
    let credentials =
        Credentials::parse(name, password.expose_secret()).map_err(|e| fail(e.into(), ""))?;
    api.login(&credentials)
        .await
        .map_err(|e| fail(e, SERVER_UNREACHABLE))?;
    info!(name = credentials.name(), "Logged in");
    render::notice(&Notice::success(format!("{} 님으로 로그인했어요.", credentials.name())))?;
    Ok(())
}

/// Validate the form and create an account.
///
/// # Errors
///
/// Returns `CommandError::Api` if validation or the signup request fails.
pub async fn signup(
    api: &ApiClient,
    name: &str,
    password: &SecretString,
    confirm: &SecretString,
) -> Result<(), CommandError> {
    let request = SignupRequest::parse(name, password.expose_secret(), confirm.expose_secret())
        .map_err(|e| fail(e.into(), ""))?;
    api.signup(&request)
        .await
        .map_err(|e| fail(e, SERVER_UNREACHABLE))?;
    info!(name = request.credentials().name(), "Signed up");
    render::notice(&Notice::success(
        "회원가입이 완료되었습니다. `posleep login` 으로 로그인하세요.",
    ))?;
    Ok(())
}

/// Forget the saved token.
///
/// # Errors
///
/// Returns `CommandError::Api` if the token file cannot be removed.
pub fn logout(api: &ApiClient) -> Result<(), CommandError> {
    api.logout()?;
    render::notice(&Notice::success(LOGGED_OUT))?;
    Ok(())
}

/// Print the login name from the saved token.
///
/// # Errors
///
/// Returns `CommandError::Api` if the token file cannot be read.
pub fn whoami(api: &ApiClient) -> Result<(), CommandError> {
    let auth = api.auth();
    let mut out = std::io::stdout().lock();
    if !auth.is_logged_in()? {
        writeln!(out, "로그인되어 있지 않아요.")?;
        return Ok(());
    }
    match auth.subject()? {
        Some(name) => writeln!(out, "{name}")?,
        None => writeln!(out, "로그인되어 있어요.")?,
    }
    Ok(())
}
