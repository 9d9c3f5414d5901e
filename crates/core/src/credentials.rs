//! Login and signup input validation.
//!
//! Validation runs before any request is built; an invalid form never
//! reaches the network.

use serde::Serialize;

/// Client-side validation failures. The messages are shown verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The user name is shorter than [`Credentials::MIN_NAME_LENGTH`].
    #[error("아이디는 3자 이상 입력해주세요.")]
    NameTooShort,
    /// The password is shorter than [`Credentials::MIN_PASSWORD_LENGTH`].
    #[error("비밀번호는 4자 이상 입력해주세요.")]
    PasswordTooShort,
    /// Signup password and confirmation differ.
    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,
    /// An uploaded file is empty.
    #[error("빈 파일은 업로드할 수 없어요.")]
    EmptyUpload,
    /// An uploaded file is not PNG, JPEG or WebP.
    #[error("PNG, JPEG, WebP 이미지만 업로드할 수 있어요. ({0})")]
    UnsupportedImage(String),
}

/// A user name and password that passed validation.
///
/// Serializes to the `{name, password}` body of the auth endpoints. The
/// password is kept exactly as typed; only the length check trims it.
#[derive(Clone, Serialize)]
pub struct Credentials {
    name: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Minimum user name length, in characters, after trimming.
    pub const MIN_NAME_LENGTH: usize = 3;
    /// Minimum password length, in characters, after trimming.
    pub const MIN_PASSWORD_LENGTH: usize = 4;

    /// Validate a login form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameTooShort`] or
    /// [`ValidationError::PasswordTooShort`].
    pub fn parse(name: &str, password: &str) -> Result<Self, ValidationError> {
        if name.trim().chars().count() < Self::MIN_NAME_LENGTH {
            return Err(ValidationError::NameTooShort);
        }
        if password.trim().chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(Self {
            name: name.to_string(),
            password: password.to_string(),
        })
    }

    /// The user name as entered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The password as entered.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// A validated signup form.
#[derive(Debug, Clone)]
pub struct SignupRequest(Credentials);

impl SignupRequest {
    /// Validate a signup form, including the password confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in the order name, password length,
    /// confirmation.
    pub fn parse(name: &str, password: &str, confirm: &str) -> Result<Self, ValidationError> {
        let credentials = Credentials::parse(name, password)?;
        if password != confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Self(credentials))
    }

    /// The credentials to send.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.0
    }
}
