//! Posleep Core - Shared types and availability rules.
//!
//! This crate provides the domain model and the pure rules used by every
//! Posleep component:
//! - `client` - REST client, view controllers and submission layer
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Every derived value shown to the user (requirement
//! severity, capacity level, cook eligibility, the filtered/sorted view) is
//! computed here from raw entity fields.
//!
//! # Modules
//!
//! - [`types`] - Entities, type-safe IDs and wire envelopes
//! - [`availability`] - Requirement severity, pot capacity and cook eligibility
//! - [`collation`] - Case- and accent-insensitive name ordering
//! - [`projection`] - Filter/sort/search over ingredient and recipe rows
//! - [`credentials`] - Login/signup input validation
//! - [`icons`] - Ingredient icon lookup

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod availability;
pub mod collation;
pub mod credentials;
pub mod icons;
pub mod projection;
pub mod types;

pub use availability::*;
pub use credentials::{Credentials, SignupRequest, ValidationError};
pub use types::*;
