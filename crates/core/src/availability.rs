//! Availability rules: requirement severity, pot capacity and cook eligibility.
//!
//! Every function here is pure and total. Missing values are substituted with
//! `0` before any comparison, so a recipe row straight off the wire can be
//! classified without pre-processing.
//!
//! The thresholds (`< 4`, `< 7`, `< 10`) and the camping bonus
//! (`ceil(capacity / 2)`) are game balancing rules and must not change.

use serde::{Deserialize, Serialize};

use crate::types::{PotSetting, Recipe, RecipeSlot};

/// How badly a recipe slot is short of its ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The recipe does not use this slot.
    Inapplicable,
    /// Nothing missing.
    Satisfied,
    /// 1-3 missing.
    Low,
    /// 4-6 missing.
    Medium,
    /// 7-9 missing.
    High,
    /// 10 or more missing.
    Critical,
}

impl Severity {
    /// Stable style token for renderers.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Inapplicable => "inapplicable",
            Self::Satisfied => "satisfied",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Classify one slot from its `need` and `req` values.
#[must_use]
pub fn classify_requirement(need: Option<i32>, req: Option<i32>) -> Severity {
    let need = need.unwrap_or(0);
    let req = req.unwrap_or(0);
    if need == 0 {
        return Severity::Inapplicable;
    }
    match req {
        0 => Severity::Satisfied,
        r if r < 4 => Severity::Low,
        r if r < 7 => Severity::Medium,
        r if r < 10 => Severity::High,
        _ => Severity::Critical,
    }
}

/// Classify a [`RecipeSlot`].
#[must_use]
pub fn slot_severity(slot: &RecipeSlot) -> Severity {
    classify_requirement(slot.need, slot.req)
}

/// How a recipe's total quantity compares with the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityLevel {
    /// Fits in one pot.
    WithinCapacity,
    /// Exceeds the pot but fits in two.
    NearCapacity,
    /// More than twice the pot.
    Overflow,
}

impl CapacityLevel {
    /// Stable style token for renderers.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::WithinCapacity => "within",
            Self::NearCapacity => "near",
            Self::Overflow => "overflow",
        }
    }
}

impl std::fmt::Display for CapacityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Pot capacity including the camping bonus of half the base, rounded up.
#[must_use]
pub fn effective_capacity(capacity: Option<i32>, is_camping: bool) -> i64 {
    let base = i64::from(capacity.unwrap_or(0));
    if is_camping {
        // ceil(base / 2) for non-negative base
        base + (base + 1).div_euclid(2)
    } else {
        base
    }
}

/// Classify a recipe total against the pot.
#[must_use]
pub fn classify_capacity(
    total_quantity: Option<i32>,
    capacity: Option<i32>,
    is_camping: bool,
) -> CapacityLevel {
    let total = i64::from(total_quantity.unwrap_or(0));
    let effective = effective_capacity(capacity, is_camping);
    if total > effective * 2 {
        CapacityLevel::Overflow
    } else if total > effective {
        CapacityLevel::NearCapacity
    } else {
        CapacityLevel::WithinCapacity
    }
}

/// Classify a recipe against the user's pot setting.
#[must_use]
pub fn recipe_capacity(recipe: &Recipe, pot: &PotSetting) -> CapacityLevel {
    classify_capacity(Some(recipe.total_quantity), Some(pot.capacity), pot.is_camping)
}

/// Sum of the missing quantities over all slots, absent values counting as `0`.
#[must_use]
pub fn total_required(slots: &[RecipeSlot]) -> i64 {
    slots.iter().map(|s| i64::from(s.req.unwrap_or(0))).sum()
}

/// A recipe can be cooked only when nothing is missing.
#[must_use]
pub fn is_cookable(recipe: &Recipe) -> bool {
    total_required(&recipe.slots) == 0
}

/// Every derived value of one recipe row, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeAvailability {
    pub slot_severity: [Severity; crate::types::SLOT_COUNT],
    pub capacity: CapacityLevel,
    pub req_total: i64,
    pub cookable: bool,
}

impl RecipeAvailability {
    /// Derive the availability of `recipe` under `pot`.
    #[must_use]
    pub fn of(recipe: &Recipe, pot: &PotSetting) -> Self {
        let req_total = total_required(&recipe.slots);
        Self {
            slot_severity: recipe.slots.each_ref().map(slot_severity),
            capacity: recipe_capacity(recipe, pot),
            req_total,
            cookable: req_total == 0,
        }
    }
}
