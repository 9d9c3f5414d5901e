//! View-state controllers.
//!
//! A board owns the editable working copy of one screen, the filter/sort
//! selection, the in-flight flags and the last [`Notice`]. The working copy
//! is only replaced by an explicit load; failed submissions keep local edits.

mod ingredients;
pub mod notice;
mod recipes;

pub use ingredients::IngredientBoard;
pub use notice::{Notice, NoticeKind};
pub use recipes::RecipeBoard;
