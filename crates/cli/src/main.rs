//! Posleep CLI - terminal front end for the Posleep inventory backend.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the token is saved under $POSLEEP_TOKEN_DIR)
//! posleep login -n sleepy -p secret
//!
//! # Registered ingredients, by id
//! posleep ingredients list
//!
//! # Set a quantity and save the working set
//! posleep ingredients set 3 12
//!
//! # Recipes in the pot's category, targets first
//! posleep recipes list
//!
//! # Cook a recipe (asks for confirmation unless --yes)
//! posleep cook 7
//! ```
//!
//! # Environment Variables
//!
//! - `POSLEEP_BACKEND_URL`, `POSLEEP_TIMEOUT_SECS`, `POSLEEP_TOKEN_DIR` - see
//!   [`posleep_client::ClientConfig`]
//! - `RUST_LOG` - log filter (default: `posleep_cli=info,posleep_client=info`)
//! - `POSLEEP_LOG_JSON` - emit JSON logs
//! - `SENTRY_DSN` - report warnings and errors to Sentry

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use posleep_client::{ApiClient, AuthContext, ClientConfig, FileTokenStore};
use posleep_core::projection::CategoryFilter;
use posleep_core::{
    IngredientId, IngredientSortKey, PotCategory, RecipeId, RecipeSortKey, SortDirection,
    StatusFilter,
};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "posleep")]
#[command(author, version, about = "Posleep ingredient and recipe manager")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "POSLEEP_BACKEND_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the token
    Login {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, env = "POSLEEP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, env = "POSLEEP_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation
        #[arg(short, long)]
        confirm: String,
    },
    /// Forget the saved token
    Logout,
    /// Show who is logged in
    Whoami,
    /// Ingredient stock
    Ingredients {
        #[command(subcommand)]
        action: IngredientAction,
    },
    /// Recipe availability
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Pot setting
    Pot {
        #[command(subcommand)]
        action: PotAction,
    },
    /// Cook a recipe; the backend consumes its ingredients
    Cook {
        id: RecipeId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum IngredientAction {
    /// List ingredients
    List {
        /// `all`, `registered` or `unregistered`
        #[arg(
            short,
            long,
            default_value = "registered",
            value_parser = StatusFilter::parse_for_ingredients
        )]
        status: StatusFilter,

        /// `id`, `name`, `quantity` or `registered`
        #[arg(long, default_value = "id")]
        sort: IngredientSortKey,

        /// `asc` or `desc`
        #[arg(short, long, default_value = "asc")]
        direction: SortDirection,

        /// Search by name
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Set an owned quantity
    Set { id: IngredientId, quantity: i32 },
    /// Add to (or, when negative, subtract from) an owned quantity
    Adjust {
        id: IngredientId,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Flip the registered flag
    Toggle {
        #[arg(required = true)]
        ids: Vec<IngredientId>,
    },
    /// Upload a PNG, JPEG or WebP image for OCR
    Ocr { path: PathBuf },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// List recipes with their shortages
    List {
        /// `all`, `registered`, `unregistered` or `target`
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// `id`, `name`, `total`, `registered` or `target`
        #[arg(long, default_value = "target")]
        sort: RecipeSortKey,

        /// `asc` or `desc`
        #[arg(short, long, default_value = "desc")]
        direction: SortDirection,

        /// Category; defaults to the pot's category
        #[arg(short, long)]
        category: Option<CategoryFilter>,

        /// Search by name or category
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Flip the target flag
    Target {
        #[arg(required = true)]
        ids: Vec<RecipeId>,
    },
    /// Flip the registered flag
    Register {
        #[arg(required = true)]
        ids: Vec<RecipeId>,
    },
}

#[derive(Subcommand)]
enum PotAction {
    /// Show the pot setting
    Show,
    /// Change the pot setting
    Set {
        #[arg(long)]
        capacity: Option<i32>,

        #[arg(long)]
        camping: Option<bool>,

        /// `전체`, `카레/스튜`, `샐러드`, `드링크/디저트` (or all/curry/salad/dessert)
        #[arg(long)]
        category: Option<PotCategory>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "posleep_cli=info,posleep_client=info".into());

    // stdout carries command output; logs go to stderr
    let json = std::env::var("POSLEEP_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn client(backend_url: Option<&str>) -> Result<ApiClient, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = backend_url {
        config = config.with_backend_url(url)?;
    }
    let store = Arc::new(FileTokenStore::in_dir(&config.token_dir));
    Ok(ApiClient::new(&config, AuthContext::new(store))?)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api = client(cli.backend_url.as_deref())?;

    match cli.command {
        Commands::Login { name, password } => {
            commands::auth::login(&api, &name, &SecretString::from(password)).await?;
        }
        Commands::Signup {
            name,
            password,
            confirm,
        } => {
            commands::auth::signup(
                &api,
                &name,
                &SecretString::from(password),
                &SecretString::from(confirm),
            )
            .await?;
        }
        Commands::Logout => commands::auth::logout(&api)?,
        Commands::Whoami => commands::auth::whoami(&api)?,
        Commands::Ingredients { action } => match action {
            IngredientAction::List {
                status,
                sort,
                direction,
                query,
            } => {
                let view = commands::ingredients::ListOptions {
                    status,
                    sort,
                    direction,
                    query,
                };
                commands::ingredients::list(api, &view).await?;
            }
            IngredientAction::Set { id, quantity } => {
                commands::ingredients::edit(api, |board| board.set_quantity(id, quantity)).await?;
            }
            IngredientAction::Adjust { id, delta } => {
                commands::ingredients::edit(api, |board| board.adjust_quantity(id, delta)).await?;
            }
            IngredientAction::Toggle { ids } => {
                commands::ingredients::edit(api, |board| {
                    ids.iter().try_for_each(|id| board.toggle_registered(*id))
                })
                .await?;
            }
            IngredientAction::Ocr { path } => commands::ingredients::ocr(api, &path).await?,
        },
        Commands::Recipes { action } => match action {
            RecipeAction::List {
                status,
                sort,
                direction,
                category,
                query,
            } => {
                let view = commands::recipes::ListOptions {
                    status,
                    sort,
                    direction,
                    category,
                    query,
                };
                commands::recipes::list(api, &view).await?;
            }
            RecipeAction::Target { ids } => {
                commands::recipes::edit_flags(api, |board| {
                    ids.iter().try_for_each(|id| board.toggle_target(*id))
                })
                .await?;
            }
            RecipeAction::Register { ids } => {
                commands::recipes::edit_flags(api, |board| {
                    ids.iter().try_for_each(|id| board.toggle_registered(*id))
                })
                .await?;
            }
        },
        Commands::Pot { action } => match action {
            PotAction::Show => commands::recipes::show_pot(api).await?,
            PotAction::Set {
                capacity,
                camping,
                category,
            } => commands::recipes::set_pot(api, capacity, camping, category).await?,
        },
        Commands::Cook { id, yes } => commands::recipes::cook(api, id, yes).await?,
    }
    Ok(())
}
