//! Ingredient commands.

use std::path::Path;

use posleep_client::views::notice::{INGREDIENTS_SAVE_FAILED, OCR_FAILED};
use posleep_client::{ApiClient, ApiError, ImageUpload, IngredientBoard};
use posleep_core::{IngredientSortKey, SortDirection, StatusFilter};

use super::{CommandError, fail};
use crate::render;

/// View selection for `ingredients list`.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub status: StatusFilter,
    pub sort: IngredientSortKey,
    pub direction: SortDirection,
    pub query: Option<String>,
}

/// Load the board; the banner is printed on failure.
async fn load(api: ApiClient) -> Result<IngredientBoard, CommandError> {
    let mut board = IngredientBoard::new(api);
    if let Err(e) = board.load().await {
        print_notice(&mut board)?;
        return Err(e.into());
    }
    Ok(board)
}

fn print_notice(board: &mut IngredientBoard) -> Result<(), CommandError> {
    if let Some(notice) = board.take_notice() {
        render::notice(&notice)?;
    }
    Ok(())
}

/// Print the filtered, sorted ingredient table.
///
/// # Errors
///
/// Returns `CommandError::Api` if the list cannot be fetched.
pub async fn list(api: ApiClient, options: &ListOptions) -> Result<(), CommandError> {
    let mut board = load(api).await?;
    board.set_status(options.status);
    board.set_sort(options.sort, options.direction);
    if let Some(query) = &options.query {
        board.set_query(query.as_str());
    }
    render::ingredients(&mut std::io::stdout().lock(), &board)?;
    Ok(())
}

/// Load the list, apply `edit` to the working copy and save all rows.
///
/// # Errors
///
/// Returns `CommandError::Api` if loading, the edit or the save fails.
pub async fn edit<F>(api: ApiClient, edit: F) -> Result<(), CommandError>
where
    F: FnOnce(&mut IngredientBoard) -> Result<(), ApiError>,
{
    let mut board = load(api).await?;
    edit(&mut board).map_err(|e| fail(e, INGREDIENTS_SAVE_FAILED))?;
    let result = board.save().await;
    print_notice(&mut board)?;
    result?;
    Ok(())
}

/// Upload an image for OCR and print the refreshed table.
///
/// # Errors
///
/// Returns `CommandError::Api` if the image is rejected or a request fails.
pub async fn ocr(api: ApiClient, path: &Path) -> Result<(), CommandError> {
    let image = ImageUpload::from_path(path)
        .await
        .map_err(|e| fail(e, OCR_FAILED))?;
    let mut board = IngredientBoard::new(api);
    let result = board.upload_ocr(&image).await;
    print_notice(&mut board)?;
    result?;
    render::ingredients(&mut std::io::stdout().lock(), &board)?;
    Ok(())
}
