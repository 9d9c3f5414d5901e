//! Integration tests for the recipe board: load, flags, pot and cooking.

use posleep_client::views::notice::{COOK_FAILED, POT_SAVED, RECIPES_LOAD_FAILED, flags_saved};
use posleep_client::{ApiError, RecipeBoard};
use posleep_core::projection::CategoryFilter;
use posleep_core::{CapacityLevel, PotCategory, PotSetting, RecipeId, Severity, StatusFilter};
use posleep_integration_tests::{MockBackend, MockState, fixture_state, fixture_state_with_nulls};

fn ids(board: &RecipeBoard) -> Vec<i32> {
    let mut ids: Vec<i32> = board.view().iter().map(|row| row.id.as_i32()).collect();
    ids.sort_unstable();
    ids
}

async fn loaded(backend: &MockBackend) -> RecipeBoard {
    let mut board = RecipeBoard::new(backend.client());
    board.load().await.expect("load succeeds");
    board
}

// =============================================================================
// Load
// =============================================================================

#[tokio::test]
async fn test_load_follows_pot_category() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    assert_eq!(board.rows().len(), 3);
    assert_eq!(board.pot().capacity, 10);
    assert_eq!(
        board.filters().category,
        CategoryFilter::Exact("카레/스튜".to_string())
    );
    assert_eq!(ids(&board), vec![10, 12]);

    board.set_category(CategoryFilter::All);
    assert_eq!(ids(&board), vec![10, 11, 12]);
    board.set_status(StatusFilter::Target);
    assert_eq!(ids(&board), vec![12]);
}

#[tokio::test]
async fn test_missing_pot_falls_back_to_default() {
    let backend = MockBackend::start_with(MockState {
        pot: None,
        ..fixture_state()
    })
    .await;
    let board = loaded(&backend).await;

    assert_eq!(*board.pot(), PotSetting::default());
    assert_eq!(board.filters().category, CategoryFilter::All);
    assert_eq!(ids(&board), vec![10, 11, 12]);
}

#[tokio::test]
async fn test_null_columns_classify_as_zero() {
    let backend = MockBackend::start_with(fixture_state_with_nulls()).await;
    let mut board = loaded(&backend).await;
    board.set_category(CategoryFilter::All);

    assert_eq!(ids(&board), vec![10, 11, 12, 13]);
    let honey = board
        .rows()
        .iter()
        .find(|r| r.id == RecipeId::new(13))
        .expect("null row loaded");
    assert_eq!(honey.total_quantity, 0);

    let availability = board.availability(honey);
    assert_eq!(
        availability.slot_severity,
        [
            Severity::Satisfied,
            Severity::Inapplicable,
            Severity::Inapplicable,
            Severity::Inapplicable,
        ]
    );
    assert_eq!(availability.capacity, CapacityLevel::WithinCapacity);
    assert_eq!(availability.req_total, 0);
    assert!(availability.cookable);
}

#[tokio::test]
async fn test_load_fails_when_either_fetch_fails() {
    let backend = MockBackend::start().await;
    backend.state().fail_pot = true;
    let mut board = RecipeBoard::new(backend.client());

    let err = board.load().await.expect_err("pot fetch fails");

    assert!(matches!(err, ApiError::Status { .. }));
    assert!(board.rows().is_empty());
    assert!(!board.is_loading());
    assert_eq!(board.notice().map(|n| n.text.as_str()), Some(RECIPES_LOAD_FAILED));
}

// =============================================================================
// Flags
// =============================================================================

#[tokio::test]
async fn test_save_flags_reports_changed_count() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    board.toggle_target(RecipeId::new(10)).expect("row exists");
    board
        .toggle_registered(RecipeId::new(11))
        .expect("row exists");
    let changed = board.save_flags().await.expect("save succeeds");

    assert_eq!(changed, 2);
    assert_eq!(board.notice().map(|n| n.text.clone()), Some(flags_saved(2)));
    let state = backend.state();
    assert_eq!(state.last_flags.as_ref().map(|f| f.rows.len()), Some(3));
}

// =============================================================================
// Pot
// =============================================================================

#[tokio::test]
async fn test_save_pot_persists_and_keeps_category_filter() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    board.set_pot_capacity(-5);
    assert_eq!(board.pot().capacity, 0);
    board.set_pot_capacity(20);
    board.set_pot_camping(true);
    board.set_pot_category(PotCategory::Salad);
    board.save_pot().await.expect("save succeeds");

    let saved = backend.state().pot.expect("pot stored");
    assert_eq!(saved.capacity, 20);
    assert!(saved.is_camping);
    assert_eq!(saved.category, Some(PotCategory::Salad));
    assert_eq!(board.notice().map(|n| n.text.as_str()), Some(POT_SAVED));
    assert_eq!(ids(&board), vec![10, 12]);

    // the saved category applies from the next load
    board.load().await.expect("reload succeeds");
    assert_eq!(
        board.filters().category,
        CategoryFilter::Exact("샐러드".to_string())
    );
    assert_eq!(ids(&board), vec![11]);
}

// =============================================================================
// Cook
// =============================================================================

#[tokio::test]
async fn test_cook_refetches_view() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    board.cook(RecipeId::new(12)).await.expect("cook succeeds");

    assert_eq!(board.cooking(), None);
    let state = backend.state();
    assert_eq!(state.cooked, vec![RecipeId::new(12)]);
    assert_eq!(state.count("POST /recipes/cook"), 1);
    assert_eq!(state.count("GET /recipes"), 2);
    assert_eq!(state.count("GET /recipes/pots"), 2);
    let mushroom = state
        .ingredients
        .iter()
        .find(|i| i.name == "맛있는버섯")
        .expect("ingredient exists");
    assert_eq!(mushroom.quantity, 2);
}

#[tokio::test]
async fn test_failed_cook_resets_cooking() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;
    backend.state().fail_cook = true;

    let err = board
        .cook(RecipeId::new(11))
        .await
        .expect_err("forced 500");

    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(board.cooking(), None);
    assert_eq!(board.notice().map(|n| n.text.as_str()), Some(COOK_FAILED));
    let state = backend.state();
    assert!(state.cooked.is_empty());
    // no reload after a failed cook
    assert_eq!(state.count("GET /recipes"), 1);
}

#[tokio::test]
async fn test_short_recipe_is_never_sent() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    let err = board
        .cook(RecipeId::new(10))
        .await
        .expect_err("milk is short");

    assert!(matches!(err, ApiError::NotCookable(id) if id == RecipeId::new(10)));
    assert_eq!(board.cooking(), None);
    let notice = board.notice().expect("banner set");
    assert!(notice.is_error());
    assert_eq!(notice.text, err.to_string());
    assert_eq!(backend.state().count("POST /recipes/cook"), 0);
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let backend = MockBackend::start().await;
    let mut board = loaded(&backend).await;

    let err = board
        .cook(RecipeId::new(99))
        .await
        .expect_err("no such recipe");

    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(backend.state().count("POST /recipes/cook"), 0);
}
