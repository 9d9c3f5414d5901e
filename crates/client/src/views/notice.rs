//! User-visible banner messages.

use crate::error::ApiError;

pub const INGREDIENTS_LOAD_FAILED: &str = "목록을 불러오지 못했어요.";
pub const INGREDIENTS_SAVE_FAILED: &str = "저장에 실패했습니다.";
pub const INGREDIENTS_SAVED: &str = "저장되었습니다.";
pub const OCR_FAILED: &str = "이미지 인식에 실패했어요.";
pub const OCR_APPLIED: &str = "이미지 인식 결과가 반영되었습니다.";
pub const RECIPES_LOAD_FAILED: &str = "데이터를 불러오지 못했어요.";
pub const FLAGS_SAVE_FAILED: &str = "저장에 실패했어요.";
pub const POT_SAVE_FAILED: &str = "냄비 설정 저장에 실패했어요.";
pub const POT_SAVED: &str = "냄비 설정이 저장되었습니다.";
pub const COOK_FAILED: &str = "요리 실행에 실패했어요. 잠시 후 다시 시도해주세요.";
pub const SERVER_UNREACHABLE: &str = "서버와 연결할 수 없습니다.";
pub const LOGGED_OUT: &str = "로그아웃되었습니다.";
pub const COOK_CONFIRM: &str = "요리를 실행하시겠습니까?";

/// Success message of a flags save.
#[must_use]
pub fn flags_saved(changed: i64) -> String {
    format!("{changed}건 저장되었습니다.")
}

/// Banner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A success or error banner. Replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Error banner for `err`.
    ///
    /// Errors that carry a message meant for the user keep it; transport,
    /// status and decode failures show `fallback` instead.
    #[must_use]
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::SessionExpired
            | ApiError::Validation(_)
            | ApiError::LoginRejected
            | ApiError::SignupRejected(_)
            | ApiError::Busy
            | ApiError::NotCookable(_) => Self::error(err.to_string()),
            ApiError::Http(_)
            | ApiError::Status { .. }
            | ApiError::Parse(_)
            | ApiError::Io(_)
            | ApiError::NotFound(_) => Self::error(fallback),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
