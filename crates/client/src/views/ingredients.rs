//! Ingredient stock view.

use posleep_core::projection::{self, Filters, Summary};
use posleep_core::{Ingredient, IngredientId, IngredientSortKey, SortDirection, StatusFilter};
use tracing::{info, instrument};

use super::notice::{
    INGREDIENTS_LOAD_FAILED, INGREDIENTS_SAVE_FAILED, INGREDIENTS_SAVED, Notice, OCR_APPLIED,
    OCR_FAILED,
};
use crate::api::{ApiClient, ImageUpload};
use crate::error::ApiError;

/// Working copy of the user's ingredients plus the view selection.
///
/// Every network operation comes as a `begin_*`/`finish_*` pair, so a front
/// end can run the request elsewhere and still get the in-flight guard, and
/// as an `async` method that does both.
#[derive(Debug)]
pub struct IngredientBoard {
    api: ApiClient,
    rows: Vec<Ingredient>,
    filters: Filters,
    sort_key: IngredientSortKey,
    direction: SortDirection,
    loading: bool,
    saving: bool,
    uploading: bool,
    notice: Option<Notice>,
}

impl IngredientBoard {
    /// Default status filter of the ingredient view.
    pub const DEFAULT_STATUS: StatusFilter = StatusFilter::Registered;

    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rows: Vec::new(),
            filters: Filters::status(Self::DEFAULT_STATUS),
            sort_key: IngredientSortKey::default(),
            direction: SortDirection::default(),
            loading: false,
            saving: false,
            uploading: false,
            notice: None,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The working set, in server order.
    #[must_use]
    pub fn rows(&self) -> &[Ingredient] {
        &self.rows
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    #[must_use]
    pub const fn sort(&self) -> (IngredientSortKey, SortDirection) {
        (self.sort_key, self.direction)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// The current banner, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the banner, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Rows after filtering and sorting.
    #[must_use]
    pub fn view(&self) -> Vec<&Ingredient> {
        projection::project(&self.rows, &self.filters, self.sort_key, self.direction)
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of_ingredients(&self.rows, self.view().len())
    }

    // =========================================================================
    // View selection
    // =========================================================================

    pub const fn set_status(&mut self, status: StatusFilter) {
        self.filters.status = status;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filters.query = query.into();
    }

    pub const fn set_sort(&mut self, key: IngredientSortKey, direction: SortDirection) {
        self.sort_key = key;
        self.direction = direction;
    }

    /// Column-header click: same key flips the direction, a new key sorts
    /// ascending.
    pub fn toggle_sort(&mut self, key: IngredientSortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Restore the default filter and sort. Local edits are kept.
    pub fn reset_controls(&mut self) {
        self.filters = Filters::status(Self::DEFAULT_STATUS);
        self.sort_key = IngredientSortKey::default();
        self.direction = SortDirection::default();
    }

    // =========================================================================
    // Local edits
    // =========================================================================

    fn row_mut(&mut self, id: IngredientId) -> Result<&mut Ingredient, ApiError> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("ingredient {id}")))
    }

    /// Flip the registered flag of one row.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn toggle_registered(&mut self, id: IngredientId) -> Result<(), ApiError> {
        self.row_mut(id)?.toggle_registered();
        Ok(())
    }

    /// Set the quantity of one row, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn set_quantity(&mut self, id: IngredientId, quantity: i32) -> Result<(), ApiError> {
        self.row_mut(id)?.set_quantity(quantity);
        Ok(())
    }

    /// Change the quantity of one row by `delta`, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn adjust_quantity(&mut self, id: IngredientId, delta: i32) -> Result<(), ApiError> {
        self.row_mut(id)?.adjust_quantity(delta);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn increment(&mut self, id: IngredientId) -> Result<(), ApiError> {
        self.adjust_quantity(id, 1)
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn decrement(&mut self, id: IngredientId) -> Result<(), ApiError> {
        self.adjust_quantity(id, -1)
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Mark a load as in flight.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` if a load is already running.
    pub fn begin_load(&mut self) -> Result<(), ApiError> {
        if self.loading {
            return Err(ApiError::Busy);
        }
        self.loading = true;
        Ok(())
    }

    /// Apply the result of a load. A successful load replaces the working
    /// set wholesale; a failed one keeps it.
    ///
    /// # Errors
    ///
    /// Returns the load error after setting the banner.
    pub fn finish_load(&mut self, result: Result<Vec<Ingredient>, ApiError>) -> Result<(), ApiError> {
        self.loading = false;
        match result {
            Ok(rows) => {
                self.rows = rows;
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, INGREDIENTS_LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Fetch the ingredient list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` or the fetch error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.begin_load()?;
        let result = self.api.list_ingredients().await;
        self.finish_load(result)
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Mark a save as in flight and return the rows to submit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` if a save is already running.
    pub fn begin_save(&mut self) -> Result<Vec<Ingredient>, ApiError> {
        if self.saving {
            return Err(ApiError::Busy);
        }
        self.saving = true;
        Ok(self.rows.clone())
    }

    /// Apply the result of a save. Local edits are kept either way.
    ///
    /// # Errors
    ///
    /// Returns the save error after setting the banner.
    pub fn finish_save(&mut self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.saving = false;
        match result {
            Ok(()) => {
                self.notice = Some(Notice::success(INGREDIENTS_SAVED));
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, INGREDIENTS_SAVE_FAILED));
                Err(e)
            }
        }
    }

    /// Submit the whole working set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` or the submission error.
    #[instrument(skip(self), fields(rows = self.rows.len()))]
    pub async fn save(&mut self) -> Result<(), ApiError> {
        let rows = self.begin_save()?;
        let result = self.api.update_ingredients(&rows).await;
        if result.is_ok() {
            info!(rows = rows.len(), "Saved ingredients");
        }
        self.finish_save(result)
    }

    // =========================================================================
    // OCR
    // =========================================================================

    /// Mark an OCR upload as in flight.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` if an upload is already running.
    pub fn begin_upload(&mut self) -> Result<(), ApiError> {
        if self.uploading {
            return Err(ApiError::Busy);
        }
        self.uploading = true;
        Ok(())
    }

    /// Apply the result of an OCR upload.
    ///
    /// # Errors
    ///
    /// Returns the upload error after setting the banner.
    pub fn finish_upload(&mut self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.uploading = false;
        match result {
            Ok(()) => {
                self.notice = Some(Notice::success(OCR_APPLIED));
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, OCR_FAILED));
                Err(e)
            }
        }
    }

    /// Upload an image for OCR, then refetch the list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy`, the upload error or the reload error.
    #[instrument(skip(self, image), fields(file = image.file_name()))]
    pub async fn upload_ocr(&mut self, image: &ImageUpload) -> Result<(), ApiError> {
        self.begin_upload()?;
        let result = self.api.upload_ocr(image).await;
        self.finish_upload(result)?;
        self.load().await?;
        // the reload must not hide the upload result
        self.notice = Some(Notice::success(OCR_APPLIED));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::config::ClientConfig;
    use crate::views::NoticeKind;

    fn board() -> IngredientBoard {
        let config = ClientConfig::for_backend(
            "http://127.0.0.1:9/api",
            std::env::temp_dir().join("posleep-board-test"),
        )
        .unwrap();
        IngredientBoard::new(ApiClient::new(&config, AuthContext::in_memory()).unwrap())
    }

    fn ingredient(id: i32, name: &str, registered: bool, quantity: i32) -> Ingredient {
        Ingredient {
            id: IngredientId::new(id),
            name: name.to_string(),
            is_registered: registered,
            quantity,
            target_quantity: 0,
        }
    }

    fn loaded() -> IngredientBoard {
        let mut board = board();
        board.begin_load().unwrap();
        board
            .finish_load(Ok(vec![
                ingredient(3, "튼튼밀크", true, 2),
                ingredient(1, "굵은대파", false, 0),
                ingredient(2, "맛있는버섯", true, 5),
            ]))
            .unwrap();
        board
    }

    fn ids(board: &IngredientBoard) -> Vec<i32> {
        board.view().iter().map(|r| r.id.as_i32()).collect()
    }

    #[test]
    fn test_default_view_is_registered_by_id() {
        let board = loaded();
        assert_eq!(ids(&board), vec![2, 3]);
        assert_eq!(board.summary().total, 3);
        assert_eq!(board.summary().registered, 2);
        assert_eq!(board.summary().visible, 2);
    }

    #[test]
    fn test_toggle_sort_flips_then_switches_key() {
        let mut board = loaded();
        board.set_status(StatusFilter::All);
        board.toggle_sort(IngredientSortKey::Id);
        assert_eq!(ids(&board), vec![3, 2, 1]);

        board.toggle_sort(IngredientSortKey::Quantity);
        assert_eq!(board.sort(), (IngredientSortKey::Quantity, SortDirection::Asc));
        assert_eq!(ids(&board), vec![1, 3, 2]);

        board.reset_controls();
        assert_eq!(board.filters().status, StatusFilter::Registered);
        assert_eq!(board.sort(), (IngredientSortKey::Id, SortDirection::Asc));
    }

    #[test]
    fn test_quantity_edits_clamp_at_zero() {
        let mut board = loaded();
        let id = IngredientId::new(1);
        board.decrement(id).unwrap();
        assert_eq!(board.rows()[1].quantity, 0);
        board.increment(id).unwrap();
        board.increment(id).unwrap();
        assert_eq!(board.rows()[1].quantity, 2);
        board.set_quantity(id, -7).unwrap();
        assert_eq!(board.rows()[1].quantity, 0);
    }

    #[test]
    fn test_unknown_row_is_not_found() {
        let mut board = loaded();
        assert!(matches!(
            board.toggle_registered(IngredientId::new(99)),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_in_flight_operations_are_busy() {
        let mut board = loaded();
        board.begin_save().unwrap();
        assert!(matches!(board.begin_save(), Err(ApiError::Busy)));
        board.begin_load().unwrap();
        assert!(matches!(board.begin_load(), Err(ApiError::Busy)));
        board.begin_upload().unwrap();
        assert!(matches!(board.begin_upload(), Err(ApiError::Busy)));
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let mut board = loaded();
        board.toggle_registered(IngredientId::new(1)).unwrap();
        board.begin_save().unwrap();
        let err = board
            .finish_save(Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: String::new(),
            }))
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { .. }));
        assert!(!board.is_saving());
        assert!(board.rows()[1].is_registered);
        let notice = board.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "저장에 실패했습니다.");
        assert!(board.notice().is_none());
    }

    #[test]
    fn test_failed_load_keeps_rows() {
        let mut board = loaded();
        board.begin_load().unwrap();
        let _ = board.finish_load(Err(ApiError::SessionExpired));
        assert_eq!(board.rows().len(), 3);
        assert!(!board.is_loading());
        assert_eq!(
            board.notice().unwrap().text,
            "로그인이 필요합니다. 다시 로그인해주세요."
        );
    }

    #[test]
    fn test_successful_save_sets_banner() {
        let mut board = loaded();
        board.begin_save().unwrap();
        board.finish_save(Ok(())).unwrap();
        assert_eq!(board.notice().unwrap(), &Notice::success("저장되었습니다."));
    }
}
