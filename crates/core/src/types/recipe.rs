//! Recipe rows and their ingredient slots.
//!
//! The backend sends every recipe with four flat slot columns
//! (`ingredient1`, `need1`, `req1`, ... `req4`). In Rust they are folded into
//! an array of [`RecipeSlot`]s so the availability rules treat every position
//! identically.

use serde::{Deserialize, Serialize};

use super::{RecipeId, null_as_zero};

/// Number of ingredient slots a recipe row carries.
pub const SLOT_COUNT: usize = 4;

/// One ingredient requirement of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSlot {
    /// Ingredient name; not validated against the ingredient list.
    pub ingredient_name: Option<String>,
    /// Quantity required per cook.
    pub need: Option<i32>,
    /// Quantity still missing. `0` means the slot is fully stocked.
    pub req: Option<i32>,
}

impl RecipeSlot {
    /// Whether this recipe actually uses the slot.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.need.unwrap_or(0) != 0
    }
}

/// A recipe with its derived stock shortage, as computed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecipeWire", into = "RecipeWire")]
pub struct Recipe {
    pub id: RecipeId,
    pub category: Option<String>,
    pub name: String,
    pub is_target: bool,
    pub is_registered: bool,
    pub slots: [RecipeSlot; SLOT_COUNT],
    /// Sum of all ingredient quantities the recipe consumes.
    pub total_quantity: i32,
}

impl Recipe {
    /// Flip the target flag.
    pub const fn toggle_target(&mut self) {
        self.is_target = !self.is_target;
    }

    /// Flip the registered flag.
    pub const fn toggle_registered(&mut self) {
        self.is_registered = !self.is_registered;
    }

    /// Category with a missing value read as the empty string.
    #[must_use]
    pub fn category_or_empty(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeWire {
    id: RecipeId,
    #[serde(default)]
    category: Option<String>,
    name: String,
    #[serde(default)]
    is_target: bool,
    #[serde(default)]
    is_registered: bool,
    #[serde(default)]
    ingredient1: Option<String>,
    #[serde(default)]
    need1: Option<i32>,
    #[serde(default)]
    req1: Option<i32>,
    #[serde(default)]
    ingredient2: Option<String>,
    #[serde(default)]
    need2: Option<i32>,
    #[serde(default)]
    req2: Option<i32>,
    #[serde(default)]
    ingredient3: Option<String>,
    #[serde(default)]
    need3: Option<i32>,
    #[serde(default)]
    req3: Option<i32>,
    #[serde(default)]
    ingredient4: Option<String>,
    #[serde(default)]
    need4: Option<i32>,
    #[serde(default)]
    req4: Option<i32>,
    #[serde(default, deserialize_with = "null_as_zero")]
    total_quantity: i32,
}

impl From<RecipeWire> for Recipe {
    fn from(w: RecipeWire) -> Self {
        let slot = |ingredient_name, need, req| RecipeSlot {
            ingredient_name,
            need,
            req,
        };
        Self {
            id: w.id,
            category: w.category,
            name: w.name,
            is_target: w.is_target,
            is_registered: w.is_registered,
            slots: [
                slot(w.ingredient1, w.need1, w.req1),
                slot(w.ingredient2, w.need2, w.req2),
                slot(w.ingredient3, w.need3, w.req3),
                slot(w.ingredient4, w.need4, w.req4),
            ],
            total_quantity: w.total_quantity,
        }
    }
}

impl From<Recipe> for RecipeWire {
    fn from(r: Recipe) -> Self {
        let [s1, s2, s3, s4] = r.slots;
        Self {
            id: r.id,
            category: r.category,
            name: r.name,
            is_target: r.is_target,
            is_registered: r.is_registered,
            ingredient1: s1.ingredient_name,
            need1: s1.need,
            req1: s1.req,
            ingredient2: s2.ingredient_name,
            need2: s2.need,
            req2: s2.req,
            ingredient3: s3.ingredient_name,
            need3: s3.need,
            req3: s3.req,
            ingredient4: s4.ingredient_name,
            need4: s4.need,
            req4: s4.req,
            total_quantity: r.total_quantity,
        }
    }
}

/// Flag state of one recipe inside [`RecipeFlagsRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFlagRow {
    pub id: RecipeId,
    pub is_target: bool,
    pub is_registered: bool,
}

/// Body of `POST /recipes/flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFlagsRequest {
    pub rows: Vec<RecipeFlagRow>,
}

impl RecipeFlagsRequest {
    /// Collect the flags of every row in the working set.
    #[must_use]
    pub fn from_rows(rows: &[Recipe]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| RecipeFlagRow {
                    id: r.id,
                    is_target: r.is_target,
                    is_registered: r.is_registered,
                })
                .collect(),
        }
    }
}
