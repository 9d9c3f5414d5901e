//! Posleep REST API client.
//!
//! One method per backend endpoint. Every call is a single attempt: no
//! retries, no caching, no deduplication. Authenticated calls read the bearer
//! token from the injected [`AuthContext`] at send time.

mod upload;

pub use upload::ImageUpload;

use std::sync::Arc;

use posleep_core::{
    ApiEnvelope, ChangedCount, Credentials, Ingredient, IngredientUpdateRequest, PotSetting,
    Recipe, RecipeFlagsRequest, RecipeId, SignupRequest, TokenResponse,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Fallback signup message when the server sends no text.
pub const SIGNUP_FAILED: &str = "회원가입에 실패했습니다.";

/// Posleep REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the
/// [`AuthContext`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    auth: AuthContext,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, auth: AuthContext) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.backend_url.clone(),
                auth,
            }),
        })
    }

    /// The authentication context shared by this client.
    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Ingredients
    // =========================================================================

    /// Fetch every ingredient row of the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::SessionExpired` on 401/403, otherwise transport,
    /// status or decode errors.
    #[instrument(skip(self))]
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        let envelope: ApiEnvelope<Vec<Ingredient>> = self
            .send_json(self.request(Method::GET, "/ingredients")?)
            .await?;
        debug!(count = envelope.data.len(), "Fetched ingredients");
        Ok(envelope.data)
    }

    /// Submit the full ingredient working set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn update_ingredients(&self, rows: &[Ingredient]) -> Result<(), ApiError> {
        let body = IngredientUpdateRequest::from_rows(rows);
        self.send(
            self.request(Method::POST, "/ingredients/update")?
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// Upload a receipt or inventory screenshot for OCR.
    ///
    /// The server applies the recognized quantities itself; callers refetch
    /// the ingredient list afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self, image), fields(file = image.file_name(), bytes = image.len()))]
    pub async fn upload_ocr(&self, image: &ImageUpload) -> Result<(), ApiError> {
        let form = reqwest::multipart::Form::new().part("image", image.to_part()?);
        self.send(
            self.request(Method::POST, "/ingredients/ocr")?
                .multipart(form),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// Fetch every recipe row with its backend-computed shortages.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let envelope: ApiEnvelope<Vec<Recipe>> = self
            .send_json(self.request(Method::GET, "/recipes")?)
            .await?;
        debug!(count = envelope.data.len(), "Fetched recipes");
        Ok(envelope.data)
    }

    /// Fetch the pot setting; a user without one gets the default pot.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self))]
    pub async fn get_pot(&self) -> Result<PotSetting, ApiError> {
        let envelope: ApiEnvelope<Option<PotSetting>> = self
            .send_json(self.request(Method::GET, "/recipes/pots")?)
            .await?;
        Ok(envelope.data.unwrap_or_default().normalized())
    }

    /// Submit target/registered flags of every recipe.
    ///
    /// Returns the number of rows the backend changed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn save_flags(&self, rows: &[Recipe]) -> Result<i64, ApiError> {
        let body = RecipeFlagsRequest::from_rows(rows);
        let changed: ChangedCount = self
            .send_json(self.request(Method::POST, "/recipes/flags")?.json(&body))
            .await?;
        Ok(changed.changed)
    }

    /// Save the pot setting.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self))]
    pub async fn save_pot(&self, pot: &PotSetting) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/recipes/pots")?.json(pot))
            .await?;
        Ok(())
    }

    /// Cook a recipe: the backend consumes its ingredients.
    ///
    /// The body is the bare recipe id. Eligibility is checked by the caller.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_ingredients`].
    #[instrument(skip(self))]
    pub async fn cook(&self, id: RecipeId) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, "/recipes/cook")?.json(&id))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Log in and persist the issued token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::LoginRejected` on any non-2xx status and
    /// `ApiError::Http` if the server is unreachable.
    #[instrument(skip(self, credentials), fields(name = credentials.name()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Login rejected");
            return Err(ApiError::LoginRejected);
        }

        let bytes = response.bytes().await?;
        let body: TokenResponse = serde_json::from_slice(&bytes)?;
        self.inner
            .auth
            .store_token(&SecretString::from(body.token))?;
        Ok(())
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::SignupRejected` carrying the server's text (or
    /// [`SIGNUP_FAILED`]) on any non-2xx status and `ApiError::Http` if the
    /// server is unreachable.
    #[instrument(skip(self, request), fields(name = request.credentials().name()))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/signup"))
            .json(request.credentials())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "Signup rejected");
            let message = if text.trim().is_empty() {
                SIGNUP_FAILED.to_string()
            } else {
                text
            };
            return Err(ApiError::SignupRejected(message));
        }
        Ok(())
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the token store cannot be cleared.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.inner.auth.logout()
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Build an authenticated request.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.inner.client.request(method, self.url(path));
        Ok(match self.inner.auth.bearer()? {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and map failure statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            // the user must log in again even if the token could not be removed
            if let Err(e) = self.inner.auth.invalidate() {
                warn!(error = %e, "Failed to clear login token");
            }
            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let bytes = self.send(builder).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = ClientConfig::for_backend(
            "http://127.0.0.1:9/api/",
            std::env::temp_dir().join("posleep-api-test"),
        )
        .unwrap();
        ApiClient::new(&config, AuthContext::in_memory()).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = client();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
        assert_eq!(client.url("/recipes/pots"), "http://127.0.0.1:9/api/recipes/pots");
    }

    #[test]
    fn test_request_without_token_has_no_authorization() {
        let client = client();
        let request = client
            .request(Method::GET, "/ingredients")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_request_with_token_sets_bearer() {
        let client = client();
        client
            .auth()
            .store_token(&SecretString::from("opaque-token"))
            .unwrap();
        let request = client
            .request(Method::GET, "/ingredients")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer opaque-token"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client();
        client
            .auth()
            .store_token(&SecretString::from("opaque-token"))
            .unwrap();
        assert!(!format!("{client:?}").contains("opaque-token"));
    }
}
