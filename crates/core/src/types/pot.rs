//! Pot setting: the per-user cooking vessel.

use serde::{Deserialize, Serialize};

use super::PotId;

/// Dish category the pot is currently set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PotCategory {
    /// Every category.
    #[default]
    #[serde(rename = "전체")]
    All,
    #[serde(rename = "카레/스튜")]
    CurryStew,
    #[serde(rename = "샐러드")]
    Salad,
    #[serde(rename = "드링크/디저트")]
    DrinkDessert,
}

impl PotCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::CurryStew, Self::Salad, Self::DrinkDessert];

    /// Label as stored by the backend and shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "전체",
            Self::CurryStew => "카레/스튜",
            Self::Salad => "샐러드",
            Self::DrinkDessert => "드링크/디저트",
        }
    }

    /// Recipe category filter value: `None` means "all".
    #[must_use]
    pub const fn as_filter(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.label()),
        }
    }
}

impl std::fmt::Display for PotCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PotCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "전체" | "all" => Ok(Self::All),
            "카레/스튜" | "curry" => Ok(Self::CurryStew),
            "샐러드" | "salad" => Ok(Self::Salad),
            "드링크/디저트" | "dessert" => Ok(Self::DrinkDessert),
            other => Err(format!("invalid pot category: {other}")),
        }
    }
}

/// Pot capacity setting. One per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotSetting {
    #[serde(default)]
    pub id: Option<PotId>,
    #[serde(default, deserialize_with = "super::null_as_zero")]
    pub capacity: i32,
    #[serde(default)]
    pub is_camping: bool,
    #[serde(default)]
    pub category: Option<PotCategory>,
}

impl Default for PotSetting {
    fn default() -> Self {
        Self {
            id: None,
            capacity: 0,
            is_camping: false,
            category: Some(PotCategory::All),
        }
    }
}

impl PotSetting {
    /// Fill in a missing category with [`PotCategory::All`].
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.category.is_none() {
            self.category = Some(PotCategory::All);
        }
        self
    }

    /// Category with a missing value read as [`PotCategory::All`].
    #[must_use]
    pub fn category_or_all(&self) -> PotCategory {
        self.category.unwrap_or_default()
    }

    /// Set the capacity, clamping negatives to zero.
    pub fn set_capacity(&mut self, capacity: i32) {
        self.capacity = capacity.max(0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_korean_label() {
        let json = serde_json::to_string(&PotCategory::Salad).unwrap();
        assert_eq!(json, "\"샐러드\"");
        let back: PotCategory = serde_json::from_str("\"드링크/디저트\"").unwrap();
        assert_eq!(back, PotCategory::DrinkDessert);
    }

    #[test]
    fn test_missing_category_normalizes_to_all() {
        let pot: PotSetting = serde_json::from_str(r#"{"capacity":15,"isCamping":true}"#).unwrap();
        assert_eq!(pot.category, None);
        assert_eq!(pot.normalized().category, Some(PotCategory::All));
    }

    #[test]
    fn test_null_capacity_reads_as_zero() {
        let pot: PotSetting = serde_json::from_str(r#"{"capacity":null}"#).unwrap();
        assert_eq!(pot.capacity, 0);
    }

    #[test]
    fn test_set_capacity_clamps() {
        let mut pot = PotSetting::default();
        pot.set_capacity(-3);
        assert_eq!(pot.capacity, 0);
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(PotCategory::All.as_filter(), None);
        assert_eq!(PotCategory::CurryStew.as_filter(), Some("카레/스튜"));
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("salad".parse::<PotCategory>(), Ok(PotCategory::Salad));
        assert!("soup".parse::<PotCategory>().is_err());
    }
}
