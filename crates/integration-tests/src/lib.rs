//! Integration tests for the Posleep client.
//!
//! Each test starts an in-process [`MockBackend`], an axum router bound to
//! `127.0.0.1:0` that mimics the REST backend, and drives the real
//! [`posleep_client::ApiClient`] and view boards against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p posleep-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use posleep_client::{ApiClient, AuthContext, ClientConfig};
use posleep_core::{
    ApiEnvelope, ChangedCount, Ingredient, IngredientId, IngredientUpdateRequest, PotCategory,
    PotId, PotSetting, Recipe, RecipeFlagsRequest, RecipeId, RecipeSlot, TokenResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// A multipart file the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// Everything the mock backend holds and records.
#[derive(Debug, Default)]
pub struct MockState {
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<Recipe>,
    pub pot: Option<PotSetting>,
    /// Registered users: name to password.
    pub users: HashMap<String, String>,
    /// Tokens issued by login.
    pub tokens: Vec<String>,
    /// `METHOD /path` of every request, in arrival order.
    pub requests: Vec<String>,
    pub last_update: Option<IngredientUpdateRequest>,
    pub last_flags: Option<RecipeFlagsRequest>,
    pub cooked: Vec<RecipeId>,
    pub uploads: Vec<ReceivedUpload>,
    /// Answer every authenticated endpoint with this status.
    pub force_status: Option<StatusCode>,
    /// Answer `POST /recipes/cook` with 500.
    pub fail_cook: bool,
    /// Answer `GET /recipes/pots` with 500.
    pub fail_pot: bool,
    /// Ingredient rows sent verbatim after the typed ones.
    pub raw_ingredients: Vec<Value>,
    /// Recipe rows sent verbatim after the typed ones.
    pub raw_recipes: Vec<Value>,
}

impl MockState {
    /// Requests matching `METHOD /path`.
    #[must_use]
    pub fn count(&self, request: &str) -> usize {
        self.requests.iter().filter(|r| *r == request).count()
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The token the fixtures treat as logged in.
pub const FIXTURE_TOKEN: &str = "mock-token-sleepy";

fn slot(name: &str, need: i32, req: i32) -> RecipeSlot {
    RecipeSlot {
        ingredient_name: Some(name.to_string()),
        need: Some(need),
        req: Some(req),
    }
}

fn recipe(id: i32, category: &str, name: &str, target: bool, first: RecipeSlot) -> Recipe {
    let total = first.need.unwrap_or(0);
    Recipe {
        id: RecipeId::new(id),
        category: Some(category.to_string()),
        name: name.to_string(),
        is_target: target,
        is_registered: false,
        slots: [first, RecipeSlot::default(), RecipeSlot::default(), RecipeSlot::default()],
        total_quantity: total,
    }
}

/// Three ingredients, three recipes (one short of stock), a curry pot and
/// the user `sleepy` / `secret` holding [`FIXTURE_TOKEN`].
#[must_use]
pub fn fixture_state() -> MockState {
    let ingredient = |id, name: &str, registered, quantity| Ingredient {
        id: IngredientId::new(id),
        name: name.to_string(),
        is_registered: registered,
        quantity,
        target_quantity: 5,
    };
    MockState {
        ingredients: vec![
            ingredient(1, "굵은대파", true, 3),
            ingredient(2, "튼튼밀크", false, 0),
            ingredient(3, "맛있는버섯", true, 7),
        ],
        recipes: vec![
            recipe(10, "카레/스튜", "밀크 카레", false, slot("튼튼밀크", 4, 4)),
            recipe(11, "샐러드", "대파 샐러드", false, slot("굵은대파", 3, 0)),
            recipe(12, "카레/스튜", "버섯 스튜", true, slot("맛있는버섯", 5, 0)),
        ],
        pot: Some(PotSetting {
            id: Some(PotId::new(1)),
            capacity: 10,
            is_camping: false,
            category: Some(PotCategory::CurryStew),
        }),
        users: HashMap::from([("sleepy".to_string(), "secret".to_string())]),
        tokens: vec![FIXTURE_TOKEN.to_string()],
        ..MockState::default()
    }
}

/// [`fixture_state`] plus one ingredient and one recipe whose numeric
/// columns are `null`, as the backend sends them for rows outside any
/// target recipe.
#[must_use]
pub fn fixture_state_with_nulls() -> MockState {
    MockState {
        raw_ingredients: vec![json!({
            "id": 4,
            "name": "달콤한꿀",
            "isRegistered": true,
            "quantity": null,
            "targetQuantity": null,
        })],
        raw_recipes: vec![json!({
            "id": 13,
            "category": "드링크/디저트",
            "name": "꿀 우유",
            "isTarget": false,
            "isRegistered": true,
            "ingredient1": "달콤한꿀", "need1": 2, "req1": null,
            "ingredient2": null, "need2": null, "req2": null,
            "totalQuantity": null,
        })],
        ..fixture_state()
    }
}

/// Typed rows followed by the verbatim ones, wrapped in the success envelope.
fn envelope_of<T: serde::Serialize>(rows: &[T], raw: &[Value]) -> Json<Value> {
    let data: Vec<Value> = rows
        .iter()
        .map(|row| json!(row))
        .chain(raw.iter().cloned())
        .collect();
    Json(json!({"status": "success", "data": data}))
}

/// An axum server standing in for the REST backend.
pub struct MockBackend {
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Start a backend with [`fixture_state`].
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::start_with(fixture_state()).await
    }

    /// Start a backend with the given state.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start_with(state: MockState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));
        let app = Router::new().nest("/api", routes()).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("Mock backend has no local address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Inspect or change the backend state.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// A client already holding [`FIXTURE_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let auth = AuthContext::in_memory();
        auth.store_token(&secrecy::SecretString::from(FIXTURE_TOKEN))
            .expect("Failed to store fixture token");
        self.client_with(auth)
    }

    /// A client using `auth`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client_with(&self, auth: AuthContext) -> ApiClient {
        let config = ClientConfig::for_backend(
            &self.base_url,
            std::env::temp_dir().join("posleep-integration"),
        )
        .expect("Invalid mock backend URL");
        ApiClient::new(&config, auth).expect("Failed to build client")
    }
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/update", post(update_ingredients))
        .route("/ingredients/ocr", post(upload_ocr))
        .route("/recipes", get(list_recipes))
        .route("/recipes/pots", get(get_pot).post(save_pot))
        .route("/recipes/flags", post(save_flags))
        .route("/recipes/cook", post(cook))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
}

/// Record the request and check the bearer token.
fn authorize(state: &mut MockState, headers: &HeaderMap, request: &str) -> Result<(), StatusCode> {
    state.requests.push(request.to_string());
    if let Some(status) = state.force_status {
        return Err(status);
    }
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if state.tokens.iter().any(|t| t == token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn ok() -> Json<Value> {
    Json(json!({"status": "success"}))
}

async fn list_ingredients(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "GET /ingredients")?;
    Ok(envelope_of(&state.ingredients, &state.raw_ingredients))
}

async fn update_ingredients(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<IngredientUpdateRequest>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "POST /ingredients/update")?;
    // the submitted set replaces every row, verbatim ones included
    state.ingredients.clone_from(&body.rows);
    state.raw_ingredients.clear();
    state.last_update = Some(body);
    Ok(ok())
}

/// Records the upload and adds one to the first ingredient.
async fn upload_ocr(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    authorize(&mut lock(&state), &headers, "POST /ingredients/ocr")?;

    let mut received = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        received.push(ReceivedUpload {
            field: name,
            file_name,
            content_type,
            len: bytes.len(),
        });
    }

    let mut state = lock(&state);
    if let Some(first) = state.ingredients.first_mut() {
        first.quantity += 1;
    }
    state.uploads.extend(received);
    Ok(ok())
}

async fn list_recipes(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "GET /recipes")?;
    Ok(envelope_of(&state.recipes, &state.raw_recipes))
}

async fn get_pot(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<ApiEnvelope<Option<PotSetting>>>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "GET /recipes/pots")?;
    if state.fail_pot {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(ApiEnvelope::success(state.pot)))
}

async fn save_pot(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(pot): Json<PotSetting>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "POST /recipes/pots")?;
    state.pot = Some(pot);
    Ok(ok())
}

/// Applies the flags and counts rows whose flags actually changed.
async fn save_flags(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<RecipeFlagsRequest>,
) -> Result<Json<ChangedCount>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "POST /recipes/flags")?;
    let mut changed = 0;
    for row in &body.rows {
        if let Some(recipe) = state.recipes.iter_mut().find(|r| r.id == row.id)
            && (recipe.is_target != row.is_target || recipe.is_registered != row.is_registered)
        {
            recipe.is_target = row.is_target;
            recipe.is_registered = row.is_registered;
            changed += 1;
        }
    }
    state.last_flags = Some(body);
    Ok(Json(ChangedCount { changed }))
}

/// Consumes the first slot's ingredient.
async fn cook(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(id): Json<RecipeId>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = lock(&state);
    authorize(&mut state, &headers, "POST /recipes/cook")?;
    if state.fail_cook {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let consumed = state
        .recipes
        .iter()
        .find(|r| r.id == id)
        .and_then(|r| Some((r.slots.first()?.ingredient_name.clone()?, r.slots.first()?.need?)));
    if let Some((name, need)) = consumed
        && let Some(ingredient) = state.ingredients.iter_mut().find(|i| i.name == name)
    {
        ingredient.quantity = (ingredient.quantity - need).max(0);
    }
    state.cooked.push(id);
    Ok(ok())
}

#[derive(Deserialize)]
struct AuthBody {
    name: String,
    password: String,
}

async fn login(
    State(state): State<Shared>,
    Json(body): Json<AuthBody>,
) -> Result<Json<TokenResponse>, StatusCode> {
    let mut state = lock(&state);
    state.requests.push("POST /auth/login".to_string());
    if state.users.get(&body.name) != Some(&body.password) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = format!("mock-token-{}", body.name);
    state.tokens.push(token.clone());
    Ok(Json(TokenResponse { token }))
}

async fn signup(
    State(state): State<Shared>,
    Json(body): Json<AuthBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut state = lock(&state);
    state.requests.push("POST /auth/signup".to_string());
    if state.users.contains_key(&body.name) {
        return Err((
            StatusCode::CONFLICT,
            "이미 사용 중인 아이디입니다.".to_string(),
        ));
    }
    state.users.insert(body.name, body.password);
    Ok(StatusCode::OK)
}
