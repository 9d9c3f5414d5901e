//! Core types for Posleep.
//!
//! Raw entities exactly as the backend sends them, plus type-safe IDs.

pub mod envelope;
pub mod id;
pub mod ingredient;
pub mod pot;
pub mod recipe;
pub mod status;

pub use envelope::{ApiEnvelope, ChangedCount, TokenResponse};
pub use id::*;
pub use ingredient::{Ingredient, IngredientUpdateRequest};
pub use pot::{PotCategory, PotSetting};
pub use recipe::{Recipe, RecipeFlagRow, RecipeFlagsRequest, RecipeSlot, SLOT_COUNT};
pub use status::*;

use serde::{Deserialize, Deserializer};

/// Read a missing or `null` integer as zero.
///
/// Aggregates from outer joins (`targetQuantity`, `totalQuantity`) arrive as
/// `null` for rows with nothing to sum.
pub(crate) fn null_as_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}
