//! Integration tests for the ingredient board: load, edit, save and OCR.

use std::path::PathBuf;

use axum::http::StatusCode;
use posleep_client::views::notice::{INGREDIENTS_SAVE_FAILED, INGREDIENTS_SAVED, OCR_APPLIED};
use posleep_client::{ApiError, ImageUpload, IngredientBoard, NoticeKind};
use posleep_core::{IngredientId, StatusFilter, ValidationError};
use posleep_integration_tests::{MockBackend, fixture_state_with_nulls};

fn ids(board: &IngredientBoard) -> Vec<i32> {
    board.view().iter().map(|row| row.id.as_i32()).collect()
}

/// A scratch file unique to one test.
fn scratch_file(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("posleep-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write scratch file");
    path
}

// =============================================================================
// Load
// =============================================================================

#[tokio::test]
async fn test_load_shows_registered_rows_by_default() {
    let backend = MockBackend::start().await;
    let mut board = IngredientBoard::new(backend.client());

    board.load().await.expect("load succeeds");

    assert_eq!(board.rows().len(), 3);
    let mut visible = ids(&board);
    visible.sort_unstable();
    assert_eq!(visible, vec![1, 3]);
    assert!(!board.is_loading());

    board.set_status(StatusFilter::All);
    assert_eq!(board.view().len(), 3);
    board.set_query("버섯");
    assert_eq!(ids(&board), vec![3]);
}

#[tokio::test]
async fn test_null_quantities_load_as_zero() {
    let backend = MockBackend::start_with(fixture_state_with_nulls()).await;
    let mut board = IngredientBoard::new(backend.client());

    board.load().await.expect("null columns are accepted");

    assert_eq!(board.rows().len(), 4);
    let honey = board
        .rows()
        .iter()
        .find(|r| r.id == IngredientId::new(4))
        .expect("null row loaded");
    assert_eq!(honey.quantity, 0);
    assert_eq!(honey.target_quantity, 0);
    let mut visible = ids(&board);
    visible.sort_unstable();
    assert_eq!(visible, vec![1, 3, 4]);

    board.save().await.expect("save succeeds");
    let state = backend.state();
    let submitted = &state.last_update.as_ref().expect("update received").rows;
    assert_eq!(submitted.len(), 4);
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
async fn test_edits_are_submitted_as_whole_set() {
    let backend = MockBackend::start().await;
    let mut board = IngredientBoard::new(backend.client());
    board.load().await.expect("load succeeds");

    board
        .toggle_registered(IngredientId::new(2))
        .expect("row exists");
    board.set_quantity(IngredientId::new(1), -3).expect("row exists");
    board.increment(IngredientId::new(3)).expect("row exists");
    board.save().await.expect("save succeeds");

    let notice = board.notice().expect("banner set");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, INGREDIENTS_SAVED);

    let state = backend.state();
    let submitted = &state.last_update.as_ref().expect("update received").rows;
    assert_eq!(submitted.len(), 3);
    let row = move |id| {
        submitted
            .iter()
            .find(|r| r.id == IngredientId::new(id))
            .expect("row submitted")
    };
    assert_eq!(row(1).quantity, 0);
    assert!(row(2).is_registered);
    assert_eq!(row(3).quantity, 8);
}

#[tokio::test]
async fn test_failed_save_keeps_local_edits() {
    let backend = MockBackend::start().await;
    let mut board = IngredientBoard::new(backend.client());
    board.load().await.expect("load succeeds");
    board.set_quantity(IngredientId::new(1), 9).expect("row exists");

    backend.state().force_status = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let err = board.save().await.expect_err("forced 500");

    assert!(matches!(err, ApiError::Status { .. }));
    assert!(!board.is_saving());
    let notice = board.notice().expect("banner set");
    assert!(notice.is_error());
    assert_eq!(notice.text, INGREDIENTS_SAVE_FAILED);
    let edited = board
        .rows()
        .iter()
        .find(|r| r.id == IngredientId::new(1))
        .expect("row kept");
    assert_eq!(edited.quantity, 9);
}

// =============================================================================
// OCR
// =============================================================================

#[tokio::test]
async fn test_ocr_uploads_image_and_reloads() {
    let backend = MockBackend::start().await;
    let mut board = IngredientBoard::new(backend.client());
    let path = scratch_file("receipt.png", b"\x89PNG fake image bytes");

    let image = ImageUpload::from_path(&path).await.expect("png accepted");
    board.upload_ocr(&image).await.expect("upload succeeds");

    {
        let state = backend.state();
        let upload = state.uploads.first().expect("file received");
        assert_eq!(upload.field, "image");
        assert_eq!(upload.file_name.as_deref(), Some("receipt.png"));
        assert_eq!(upload.content_type.as_deref(), Some("image/png"));
        assert_eq!(upload.len, image.len());
        assert_eq!(
            state.requests,
            vec!["POST /ingredients/ocr".to_string(), "GET /ingredients".to_string()]
        );
    }

    let first = board
        .rows()
        .iter()
        .find(|r| r.id == IngredientId::new(1))
        .expect("reloaded");
    assert_eq!(first.quantity, 4);
    assert_eq!(board.notice().map(|n| n.text.as_str()), Some(OCR_APPLIED));
    assert!(!board.is_uploading());
}

#[tokio::test]
async fn test_unsupported_image_is_rejected_before_upload() {
    let backend = MockBackend::start().await;
    let path = scratch_file("receipt.gif", b"GIF89a");

    let err = ImageUpload::from_path(&path)
        .await
        .expect_err("gif is not accepted");

    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::UnsupportedImage(_))
    ));
    assert!(backend.state().requests.is_empty());
}
