//! Filter/sort/search projection of ingredient and recipe rows.
//!
//! A projection is a pure function of the raw rows and the current view
//! selection. It never mutates the rows; callers re-run it whenever either
//! input changes.
//!
//! Filtering is conjunctive (status AND search AND category). Sorting uses a
//! single key and a stable sort, so rows with equal keys keep their input
//! order in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::collation;
use crate::types::{
    Ingredient, IngredientSortKey, Recipe, RecipeSortKey, SortDirection, StatusFilter,
};

/// Category filter. `All` is the pass-through sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Build a filter from an optional category; `None` means all.
    #[must_use]
    pub fn from_option(category: Option<&str>) -> Self {
        category.map_or(Self::All, |c| Self::Exact(c.to_string()))
    }

    fn matches(&self, category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Exact(wanted) => category.unwrap_or("") == wanted,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Exact(c) => f.write_str(c),
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" | "전체" => Self::All,
            other => Self::Exact(other.to_string()),
        })
    }
}

/// The filtering half of a view selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filters {
    pub status: StatusFilter,
    /// Free-text search over name and category. Trimmed before use.
    pub query: String,
    pub category: CategoryFilter,
}

impl Filters {
    /// Filters that only constrain the status.
    #[must_use]
    pub fn status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// A row that can be filtered by the projection.
pub trait Projectable {
    fn name(&self) -> &str;
    fn category(&self) -> Option<&str>;
    fn matches_status(&self, status: StatusFilter) -> bool;
}

/// A sort key over rows of type `R`.
pub trait SortKey<R>: Copy {
    /// Ascending comparison of two rows under this key.
    fn compare(self, a: &R, b: &R) -> Ordering;
}

impl Projectable for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn matches_status(&self, status: StatusFilter) -> bool {
        match status {
            StatusFilter::All => true,
            StatusFilter::Registered => self.is_registered,
            StatusFilter::Unregistered => !self.is_registered,
            StatusFilter::Target => false,
        }
    }
}

impl Projectable for Recipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn matches_status(&self, status: StatusFilter) -> bool {
        match status {
            StatusFilter::All => true,
            StatusFilter::Registered => self.is_registered,
            StatusFilter::Unregistered => !self.is_registered,
            StatusFilter::Target => self.is_target,
        }
    }
}

impl SortKey<Ingredient> for IngredientSortKey {
    fn compare(self, a: &Ingredient, b: &Ingredient) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => collation::compare(&a.name, &b.name),
            Self::Quantity => a.quantity.cmp(&b.quantity),
            Self::Registered => a.is_registered.cmp(&b.is_registered),
        }
    }
}

impl SortKey<Recipe> for RecipeSortKey {
    fn compare(self, a: &Recipe, b: &Recipe) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => collation::compare(&a.name, &b.name),
            Self::Total => a.total_quantity.cmp(&b.total_quantity),
            Self::Registered => a.is_registered.cmp(&b.is_registered),
            Self::Target => a.is_target.cmp(&b.is_target),
        }
    }
}

/// Filter and sort `rows`, returning references in display order.
pub fn project<'a, R, K>(
    rows: &'a [R],
    filters: &Filters,
    sort_key: K,
    direction: SortDirection,
) -> Vec<&'a R>
where
    R: Projectable,
    K: SortKey<R>,
{
    let needle = collation::fold(filters.query.trim());
    let mut view: Vec<&R> = rows
        .iter()
        .filter(|row| row.matches_status(filters.status))
        .filter(|row| {
            needle.is_empty()
                || collation::contains_folded(row.name(), &needle)
                || collation::contains_folded(row.category().unwrap_or(""), &needle)
        })
        .filter(|row| filters.category.matches(row.category()))
        .collect();

    // Vec::sort_by is stable; descending flips the comparator, not the list.
    view.sort_by(|a, b| {
        let ord = sort_key.compare(a, b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    view
}

/// Row counts shown above a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub registered: usize,
    pub target: usize,
    pub visible: usize,
}

impl Summary {
    /// Count ingredient rows.
    #[must_use]
    pub fn of_ingredients(rows: &[Ingredient], visible: usize) -> Self {
        Self {
            total: rows.len(),
            registered: rows.iter().filter(|r| r.is_registered).count(),
            target: 0,
            visible,
        }
    }

    /// Count recipe rows.
    #[must_use]
    pub fn of_recipes(rows: &[Recipe], visible: usize) -> Self {
        Self {
            total: rows.len(),
            registered: rows.iter().filter(|r| r.is_registered).count(),
            target: rows.iter().filter(|r| r.is_target).count(),
            visible,
        }
    }
}

/// `All` followed by each distinct non-empty recipe category, first seen first.
#[must_use]
pub fn category_options(rows: &[Recipe]) -> Vec<CategoryFilter> {
    let mut options = vec![CategoryFilter::All];
    for category in rows.iter().filter_map(|r| r.category.as_deref()) {
        if category.is_empty() {
            continue;
        }
        let option = CategoryFilter::Exact(category.to_string());
        if !options.contains(&option) {
            options.push(option);
        }
    }
    options
}
