//! View selection enums: status filters, sort keys and directions.

use serde::{Deserialize, Serialize};

/// Row status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Registered,
    Unregistered,
    /// Recipes marked as a cooking goal. Ingredients have no target flag and
    /// never match.
    Target,
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Registered => write!(f, "registered"),
            Self::Unregistered => write!(f, "unregistered"),
            Self::Target => write!(f, "target"),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "registered" => Ok(Self::Registered),
            "unregistered" => Ok(Self::Unregistered),
            "target" => Ok(Self::Target),
            _ => Err(format!("invalid status filter: {s}")),
        }
    }
}

impl StatusFilter {
    /// Parse a status for the ingredient view, which has no target flag.
    ///
    /// # Errors
    ///
    /// Returns an error for `target` and for unknown values.
    pub fn parse_for_ingredients(s: &str) -> Result<Self, String> {
        match s.parse()? {
            Self::Target => Err("ingredients have no target status".to_string()),
            other => Ok(other),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort direction: {s}")),
        }
    }
}

/// Sort keys available on the ingredient view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IngredientSortKey {
    #[default]
    Id,
    Name,
    Quantity,
    Registered,
}

impl std::str::FromStr for IngredientSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "quantity" => Ok(Self::Quantity),
            "registered" => Ok(Self::Registered),
            _ => Err(format!("invalid ingredient sort key: {s}")),
        }
    }
}

/// Sort keys available on the recipe view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSortKey {
    Id,
    Name,
    Total,
    Registered,
    #[default]
    Target,
}

impl std::str::FromStr for RecipeSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "total" => Ok(Self::Total),
            "registered" => Ok(Self::Registered),
            "target" => Ok(Self::Target),
            _ => Err(format!("invalid recipe sort key: {s}")),
        }
    }
}
