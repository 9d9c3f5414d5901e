//! Posleep client library.
//!
//! Talks to the Posleep REST backend and keeps the editable working copy of
//! the ingredient and recipe views.
//!
//! # Layers
//!
//! - [`api`] - fetch and submission calls (`reqwest`), one attempt each
//! - [`auth`] - explicit [`auth::AuthContext`]: bearer token, expiry policy
//!   and the [`auth::TokenStore`] it persists to
//! - [`views`] - view-state controllers: filter/sort selection, local edits,
//!   in-flight flags and the user-visible [`views::Notice`]
//! - [`config`] - environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod views;

pub use api::{ApiClient, ImageUpload};
pub use auth::{AuthContext, ExpiryPolicy, FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use views::{IngredientBoard, Notice, NoticeKind, RecipeBoard};
