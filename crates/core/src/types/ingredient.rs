//! Ingredient stock rows.

use serde::{Deserialize, Serialize};

use super::{IngredientId, null_as_zero};

/// An ingredient the user owns (or could own).
///
/// Created server-side. Locally only `is_registered` and `quantity` change
/// until the row is submitted back with [`IngredientUpdateRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub is_registered: bool,
    /// Owned quantity. Never negative.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub quantity: i32,
    /// Amount the target recipes need; `null` from the backend reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub target_quantity: i32,
}

impl Ingredient {
    /// Set the owned quantity, clamping negatives to zero.
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity.max(0);
    }

    /// Change the owned quantity by `delta`, clamping at zero.
    pub fn adjust_quantity(&mut self, delta: i32) {
        self.set_quantity(self.quantity.saturating_add(delta));
    }

    /// Flip the registered flag.
    pub const fn toggle_registered(&mut self) {
        self.is_registered = !self.is_registered;
    }
}

/// Body of `POST /ingredients/update`: the full working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientUpdateRequest {
    pub rows: Vec<Ingredient>,
}

impl IngredientUpdateRequest {
    /// Build the request from the local working set.
    ///
    /// Quantities are clamped again so a payload never carries a negative value.
    #[must_use]
    pub fn from_rows(rows: &[Ingredient]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|it| Ingredient {
                    quantity: it.quantity.max(0),
                    target_quantity: it.target_quantity.max(0),
                    ..it.clone()
                })
                .collect(),
        }
    }
}
