//! Recipe, pot and cook commands.

use std::io::{BufRead, Write};

use posleep_client::views::notice::{COOK_CONFIRM, FLAGS_SAVE_FAILED};
use posleep_client::{ApiClient, ApiError, RecipeBoard};
use posleep_core::projection::CategoryFilter;
use posleep_core::{PotCategory, RecipeId, RecipeSortKey, SortDirection, StatusFilter};
use tracing::debug;

use super::{CommandError, fail};
use crate::render;

/// View selection for `recipes list`.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub status: StatusFilter,
    pub sort: RecipeSortKey,
    pub direction: SortDirection,
    /// `None` keeps the pot's category.
    pub category: Option<CategoryFilter>,
    pub query: Option<String>,
}

async fn load(api: ApiClient) -> Result<RecipeBoard, CommandError> {
    let mut board = RecipeBoard::new(api);
    if let Err(e) = board.load().await {
        print_notice(&mut board)?;
        return Err(e.into());
    }
    Ok(board)
}

fn print_notice(board: &mut RecipeBoard) -> Result<(), CommandError> {
    if let Some(notice) = board.take_notice() {
        render::notice(&notice)?;
    }
    Ok(())
}

/// Print the recipe table under the current pot.
///
/// # Errors
///
/// Returns `CommandError::Api` if recipes or the pot cannot be fetched.
pub async fn list(api: ApiClient, options: &ListOptions) -> Result<(), CommandError> {
    let mut board = load(api).await?;
    board.set_status(options.status);
    board.set_sort(options.sort, options.direction);
    if let Some(category) = &options.category {
        board.set_category(category.clone());
    }
    if let Some(query) = &options.query {
        board.set_query(query.as_str());
    }
    render::recipes(&mut std::io::stdout().lock(), &board)?;
    Ok(())
}

/// Load, apply `edit` to the flags and save them.
///
/// # Errors
///
/// Returns `CommandError::Api` if loading, the edit or the save fails.
pub async fn edit_flags<F>(api: ApiClient, edit: F) -> Result<(), CommandError>
where
    F: FnOnce(&mut RecipeBoard) -> Result<(), ApiError>,
{
    let mut board = load(api).await?;
    edit(&mut board).map_err(|e| fail(e, FLAGS_SAVE_FAILED))?;
    let result = board.save_flags().await;
    print_notice(&mut board)?;
    result?;
    Ok(())
}

/// # Errors
///
/// Returns `CommandError::Api` if the pot cannot be fetched.
pub async fn show_pot(api: ApiClient) -> Result<(), CommandError> {
    let board = load(api).await?;
    render::pot(&mut std::io::stdout().lock(), board.pot())?;
    Ok(())
}

/// Change the given pot fields and save the setting.
///
/// # Errors
///
/// Returns `CommandError::Api` if loading or saving fails.
pub async fn set_pot(
    api: ApiClient,
    capacity: Option<i32>,
    camping: Option<bool>,
    category: Option<PotCategory>,
) -> Result<(), CommandError> {
    let mut board = load(api).await?;
    if let Some(capacity) = capacity {
        board.set_pot_capacity(capacity);
    }
    if let Some(camping) = camping {
        board.set_pot_camping(camping);
    }
    if let Some(category) = category {
        board.set_pot_category(category);
    }
    let result = board.save_pot().await;
    print_notice(&mut board)?;
    result?;
    render::pot(&mut std::io::stdout().lock(), board.pot())?;
    Ok(())
}

/// Ask `question` on stdout and read a yes/no answer from stdin.
fn confirm(question: &str) -> Result<bool, CommandError> {
    let mut out = std::io::stdout().lock();
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "예" | "네")
}

/// Cook a recipe after checking it locally and asking for confirmation.
///
/// # Errors
///
/// Returns `CommandError::Api` if the recipe is unknown or short of
/// ingredients, or a request fails, and `CommandError::Cancelled` if the
/// prompt is declined.
pub async fn cook(api: ApiClient, id: RecipeId, yes: bool) -> Result<(), CommandError> {
    let mut board = load(api).await?;

    // A short recipe is rejected before the prompt
    if let Err(e) = board.check_cookable(id) {
        print_notice(&mut board)?;
        return Err(e.into());
    }
    if !yes && !confirm(COOK_CONFIRM)? {
        debug!(recipe = %id, "Cook cancelled");
        return Err(CommandError::Cancelled);
    }

    let result = board.cook(id).await;
    print_notice(&mut board)?;
    result?;
    render::recipes(&mut std::io::stdout().lock(), &board)?;
    Ok(())
}
