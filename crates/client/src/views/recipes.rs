//! Recipe availability view, pot setting and cooking.

use posleep_core::projection::{self, CategoryFilter, Filters, Summary};
use posleep_core::{
    PotCategory, PotSetting, Recipe, RecipeAvailability, RecipeId, RecipeSortKey, SortDirection,
    StatusFilter, is_cookable,
};
use tracing::{info, instrument, warn};

use super::notice::{
    COOK_FAILED, FLAGS_SAVE_FAILED, Notice, POT_SAVE_FAILED, POT_SAVED, RECIPES_LOAD_FAILED,
    flags_saved,
};
use crate::api::ApiClient;
use crate::error::ApiError;

/// Working copy of the recipes and the pot setting plus the view selection.
///
/// Same `begin_*`/`finish_*` convention as [`super::IngredientBoard`].
#[derive(Debug)]
pub struct RecipeBoard {
    api: ApiClient,
    rows: Vec<Recipe>,
    pot: PotSetting,
    filters: Filters,
    sort_key: RecipeSortKey,
    direction: SortDirection,
    loading: bool,
    saving: bool,
    pot_saving: bool,
    cooking: Option<RecipeId>,
    notice: Option<Notice>,
}

impl RecipeBoard {
    /// Default sort direction of the recipe view (targets first).
    pub const DEFAULT_DIRECTION: SortDirection = SortDirection::Desc;

    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let pot = PotSetting::default();
        Self {
            api,
            rows: Vec::new(),
            filters: default_filters(&pot),
            pot,
            sort_key: RecipeSortKey::default(),
            direction: Self::DEFAULT_DIRECTION,
            loading: false,
            saving: false,
            pot_saving: false,
            cooking: None,
            notice: None,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    #[must_use]
    pub fn rows(&self) -> &[Recipe] {
        &self.rows
    }

    #[must_use]
    pub const fn pot(&self) -> &PotSetting {
        &self.pot
    }

    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    #[must_use]
    pub const fn sort(&self) -> (RecipeSortKey, SortDirection) {
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
    pub const fn is_pot_saving(&self) -> bool {
        self.pot_saving
    }

    /// Recipe currently being cooked.
    #[must_use]
    pub const fn cooking(&self) -> Option<RecipeId> {
        self.cooking
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Rows after filtering and sorting.
    #[must_use]
    pub fn view(&self) -> Vec<&Recipe> {
        projection::project(&self.rows, &self.filters, self.sort_key, self.direction)
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of_recipes(&self.rows, self.view().len())
    }

    /// Derived severity, capacity and eligibility of `recipe` under the
    /// current pot.
    #[must_use]
    pub fn availability(&self, recipe: &Recipe) -> RecipeAvailability {
        RecipeAvailability::of(recipe, &self.pot)
    }

    /// Category choices for the filter.
    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryFilter> {
        projection::category_options(&self.rows)
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

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filters.category = category;
    }

    pub const fn set_sort(&mut self, key: RecipeSortKey, direction: SortDirection) {
        self.sort_key = key;
        self.direction = direction;
    }

    /// Same key flips the direction, a new key sorts ascending.
    pub fn toggle_sort(&mut self, key: RecipeSortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// Restore the default filter and sort; the category follows the pot.
    pub fn reset_controls(&mut self) {
        self.filters = default_filters(&self.pot);
        self.sort_key = RecipeSortKey::default();
        self.direction = Self::DEFAULT_DIRECTION;
    }

    // =========================================================================
    // Local edits
    // =========================================================================

    fn row_mut(&mut self, id: RecipeId) -> Result<&mut Recipe, ApiError> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("recipe {id}")))
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn toggle_target(&mut self, id: RecipeId) -> Result<(), ApiError> {
        self.row_mut(id)?.toggle_target();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no row has `id`.
    pub fn toggle_registered(&mut self, id: RecipeId) -> Result<(), ApiError> {
        self.row_mut(id)?.toggle_registered();
        Ok(())
    }

    /// Set the pot capacity, clamped at zero.
    pub fn set_pot_capacity(&mut self, capacity: i32) {
        self.pot.set_capacity(capacity);
    }

    pub const fn set_pot_camping(&mut self, is_camping: bool) {
        self.pot.is_camping = is_camping;
    }

    pub const fn set_pot_category(&mut self, category: PotCategory) {
        self.pot.category = Some(category);
    }

    // =========================================================================
    // Load
    // =========================================================================

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

    /// Apply a fetched snapshot. On success the rows and the pot are
    /// replaced and the category filter follows the pot.
    ///
    /// # Errors
    ///
    /// Returns the load error after setting the banner.
    pub fn finish_load(
        &mut self,
        result: Result<(Vec<Recipe>, PotSetting), ApiError>,
    ) -> Result<(), ApiError> {
        self.loading = false;
        match result {
            Ok((rows, pot)) => {
                self.rows = rows;
                self.pot = pot.normalized();
                self.filters.category = pot_category_filter(&self.pot);
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, RECIPES_LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Fetch recipes and the pot together; either failing fails the load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` or the first fetch error.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.begin_load()?;
        let result = tokio::try_join!(self.api.list_recipes(), self.api.get_pot());
        self.finish_load(result)
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Mark a flags save as in flight and return the rows to submit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` if a save is already running.
    pub fn begin_save_flags(&mut self) -> Result<Vec<Recipe>, ApiError> {
        if self.saving {
            return Err(ApiError::Busy);
        }
        self.saving = true;
        Ok(self.rows.clone())
    }

    /// # Errors
    ///
    /// Returns the save error after setting the banner.
    pub fn finish_save_flags(&mut self, result: Result<i64, ApiError>) -> Result<i64, ApiError> {
        self.saving = false;
        match result {
            Ok(changed) => {
                self.notice = Some(Notice::success(flags_saved(changed)));
                Ok(changed)
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, FLAGS_SAVE_FAILED));
                Err(e)
            }
        }
    }

    /// Submit target/registered flags of every row.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` or the submission error.
    #[instrument(skip(self))]
    pub async fn save_flags(&mut self) -> Result<i64, ApiError> {
        let rows = self.begin_save_flags()?;
        let result = self.api.save_flags(&rows).await;
        self.finish_save_flags(result)
    }

    // =========================================================================
    // Pot
    // =========================================================================

    /// Mark a pot save as in flight and return the setting to submit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` if a pot save is already running.
    pub fn begin_save_pot(&mut self) -> Result<PotSetting, ApiError> {
        if self.pot_saving {
            return Err(ApiError::Busy);
        }
        self.pot_saving = true;
        Ok(self.pot.normalized())
    }

    /// The category filter is left alone; the next load or reset moves it
    /// to the saved pot's category.
    ///
    /// # Errors
    ///
    /// Returns the save error after setting the banner.
    pub fn finish_save_pot(&mut self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.pot_saving = false;
        match result {
            Ok(()) => {
                self.notice = Some(Notice::success(POT_SAVED));
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e, POT_SAVE_FAILED));
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ApiError::Busy` or the submission error.
    #[instrument(skip(self))]
    pub async fn save_pot(&mut self) -> Result<(), ApiError> {
        let pot = self.begin_save_pot()?;
        let result = self.api.save_pot(&pot).await;
        self.finish_save_pot(result)
    }

    // =========================================================================
    // Cook
    // =========================================================================

    /// Whether `id` may be cooked; a shortage also sets the banner.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id and
    /// `ApiError::NotCookable` when some slot is still short.
    pub fn check_cookable(&mut self, id: RecipeId) -> Result<(), ApiError> {
        let recipe = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("recipe {id}")))?;
        if !is_cookable(recipe) {
            let err = ApiError::NotCookable(id);
            self.notice = Some(Notice::from_error(&err, COOK_FAILED));
            return Err(err);
        }
        Ok(())
    }

    /// Check eligibility and mark `id` as cooking.
    ///
    /// A recipe with any shortage is rejected here, before any request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Busy` while another cook runs, otherwise the
    /// [`Self::check_cookable`] errors.
    pub fn begin_cook(&mut self, id: RecipeId) -> Result<(), ApiError> {
        if self.cooking.is_some() {
            return Err(ApiError::Busy);
        }
        self.check_cookable(id)?;
        self.cooking = Some(id);
        Ok(())
    }

    /// Clear the cooking state. On failure the cook can be retried.
    ///
    /// # Errors
    ///
    /// Returns the cook error after setting the banner.
    pub fn finish_cook(&mut self, result: Result<(), ApiError>) -> Result<(), ApiError> {
        let id = self.cooking.take();
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(recipe = ?id, error = %e, "Cook failed");
                self.notice = Some(Notice::from_error(&e, COOK_FAILED));
                Err(e)
            }
        }
    }

    /// Cook `id`, then refetch the whole view.
    ///
    /// # Errors
    ///
    /// Returns the eligibility error, the cook error or the reload error.
    #[instrument(skip(self))]
    pub async fn cook(&mut self, id: RecipeId) -> Result<(), ApiError> {
        self.begin_cook(id)?;
        let result = self.api.cook(id).await;
        self.finish_cook(result)?;
        info!(recipe = %id, "Cooked recipe");
        self.load().await
    }
}

fn pot_category_filter(pot: &PotSetting) -> CategoryFilter {
    CategoryFilter::from_option(pot.category_or_all().as_filter())
}

fn default_filters(pot: &PotSetting) -> Filters {
    Filters {
        category: pot_category_filter(pot),
        ..Filters::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::config::ClientConfig;
    use posleep_core::{CapacityLevel, RecipeSlot, Severity};

    fn board() -> RecipeBoard {
        let config = ClientConfig::for_backend(
            "http://127.0.0.1:9/api",
            std::env::temp_dir().join("posleep-board-test"),
        )
        .unwrap();
        RecipeBoard::new(ApiClient::new(&config, AuthContext::in_memory()).unwrap())
    }

    fn recipe(id: i32, category: &str, target: bool, req: i32, total: i32) -> Recipe {
        let mut slots: [RecipeSlot; 4] = Default::default();
        slots[0] = RecipeSlot {
            ingredient_name: Some("튼튼밀크".to_string()),
            need: Some(3),
            req: Some(req),
        };
        Recipe {
            id: RecipeId::new(id),
            category: Some(category.to_string()),
            name: format!("recipe {id}"),
            is_target: target,
            is_registered: false,
            slots,
            total_quantity: total,
        }
    }

    fn loaded(pot: PotSetting) -> RecipeBoard {
        let mut board = board();
        board.begin_load().unwrap();
        board
            .finish_load(Ok((
                vec![
                    recipe(1, "샐러드", false, 0, 8),
                    recipe(2, "카레/스튜", true, 4, 12),
                    recipe(3, "카레/스튜", false, 0, 20),
                ],
                pot,
            )))
            .unwrap();
        board
    }

    fn ids(board: &RecipeBoard) -> Vec<i32> {
        board.view().iter().map(|r| r.id.as_i32()).collect()
    }

    fn curry_pot() -> PotSetting {
        PotSetting {
            id: None,
            capacity: 10,
            is_camping: false,
            category: Some(PotCategory::CurryStew),
        }
    }

    #[test]
    fn test_category_filter_follows_pot() {
        let board = loaded(curry_pot());
        assert_eq!(
            board.filters().category,
            CategoryFilter::Exact("카레/스튜".to_string())
        );
        // target descending, ties keep server order
        assert_eq!(ids(&board), vec![2, 3]);
    }

    #[test]
    fn test_missing_pot_category_means_all() {
        let board = loaded(PotSetting {
            category: None,
            ..curry_pot()
        });
        assert_eq!(board.pot().category, Some(PotCategory::All));
        assert_eq!(board.filters().category, CategoryFilter::All);
        assert_eq!(ids(&board), vec![2, 1, 3]);
    }

    #[test]
    fn test_reset_controls_restores_pot_category() {
        let mut board = loaded(curry_pot());
        board.set_category(CategoryFilter::All);
        board.set_status(StatusFilter::Target);
        board.toggle_sort(RecipeSortKey::Name);
        board.reset_controls();
        assert_eq!(board.filters().status, StatusFilter::All);
        assert_eq!(
            board.filters().category,
            CategoryFilter::Exact("카레/스튜".to_string())
        );
        assert_eq!(board.sort(), (RecipeSortKey::Target, SortDirection::Desc));
    }

    #[test]
    fn test_availability_uses_current_pot() {
        let mut board = loaded(curry_pot());
        let row = board.rows()[1].clone();
        let availability = board.availability(&row);
        assert_eq!(availability.slot_severity[0], Severity::Medium);
        assert_eq!(availability.capacity, CapacityLevel::NearCapacity);
        assert!(!availability.cookable);

        board.set_pot_camping(true);
        assert_eq!(
            board.availability(&row).capacity,
            CapacityLevel::WithinCapacity
        );
    }

    #[test]
    fn test_not_cookable_is_rejected_locally() {
        let mut board = loaded(curry_pot());
        let err = board.begin_cook(RecipeId::new(2)).unwrap_err();
        assert!(matches!(err, ApiError::NotCookable(_)));
        assert_eq!(board.cooking(), None);
        assert_eq!(board.notice().unwrap().text, "재료가 부족합니다!");
    }

    #[test]
    fn test_cook_is_exclusive_and_resets_on_failure() {
        let mut board = loaded(curry_pot());
        board.begin_cook(RecipeId::new(1)).unwrap();
        assert_eq!(board.cooking(), Some(RecipeId::new(1)));
        assert!(matches!(
            board.begin_cook(RecipeId::new(3)),
            Err(ApiError::Busy)
        ));

        let _ = board.finish_cook(Err(ApiError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: String::new(),
        }));
        assert_eq!(board.cooking(), None);
        assert_eq!(
            board.notice().unwrap().text,
            "요리 실행에 실패했어요. 잠시 후 다시 시도해주세요."
        );
        // retry is allowed
        board.begin_cook(RecipeId::new(1)).unwrap();
    }

    #[test]
    fn test_unknown_recipe() {
        let mut board = loaded(curry_pot());
        assert!(matches!(
            board.begin_cook(RecipeId::new(42)),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            board.toggle_target(RecipeId::new(42)),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_flags_save_reports_changed_count() {
        let mut board = loaded(curry_pot());
        board.toggle_target(RecipeId::new(1)).unwrap();
        let rows = board.begin_save_flags().unwrap();
        assert!(rows[0].is_target);
        assert!(matches!(board.begin_save_flags(), Err(ApiError::Busy)));
        assert_eq!(board.finish_save_flags(Ok(1)).unwrap(), 1);
        assert_eq!(board.notice().unwrap().text, "1건 저장되었습니다.");
    }

    #[test]
    fn test_pot_edits_and_save() {
        let mut board = loaded(curry_pot());
        board.set_pot_capacity(-5);
        assert_eq!(board.pot().capacity, 0);
        board.set_pot_capacity(15);
        board.set_pot_category(PotCategory::Salad);

        let pot = board.begin_save_pot().unwrap();
        assert_eq!(pot.capacity, 15);
        assert!(board.is_pot_saving());
        board.finish_save_pot(Ok(())).unwrap();
        assert_eq!(
            board.filters().category,
            CategoryFilter::Exact("카레/스튜".to_string())
        );
        assert_eq!(board.notice().unwrap().text, "냄비 설정이 저장되었습니다.");

        board.reset_controls();
        assert_eq!(
            board.filters().category,
            CategoryFilter::Exact("샐러드".to_string())
        );
    }

    #[test]
    fn test_failed_pot_save_keeps_edits() {
        let mut board = loaded(curry_pot());
        board.set_pot_capacity(30);
        board.begin_save_pot().unwrap();
        let _ = board.finish_save_pot(Err(ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }));
        assert_eq!(board.pot().capacity, 30);
        assert!(!board.is_pot_saving());
        assert_eq!(board.notice().unwrap().text, "냄비 설정 저장에 실패했어요.");
    }

    #[test]
    fn test_summary_and_category_options() {
        let board = loaded(curry_pot());
        let summary = board.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.target, 1);
        assert_eq!(summary.visible, 2);
        assert_eq!(
            board.category_options(),
            vec![
                CategoryFilter::All,
                CategoryFilter::Exact("샐러드".to_string()),
                CategoryFilter::Exact("카레/스튜".to_string()),
            ]
        );
    }
}
