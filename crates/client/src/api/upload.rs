//! Image files for the OCR endpoint.

use std::path::Path;

use posleep_core::ValidationError;

use crate::error::ApiError;

/// An image validated for `POST /ingredients/ocr`.
#[derive(Clone)]
pub struct ImageUpload {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Validate an in-memory image.
    ///
    /// The MIME type is taken from the file extension; only PNG, JPEG and
    /// WebP are accepted by the OCR server.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUpload`] or
    /// [`ValidationError::UnsupportedImage`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let mime = mime_for(&file_name)
            .ok_or_else(|| ValidationError::UnsupportedImage(file_name.clone()))?;
        if bytes.is_empty() {
            return Err(ValidationError::EmptyUpload);
        }
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Read and validate an image file.
    ///
    /// The extension is checked before the file is read.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an unsupported or empty file and
    /// `ApiError::Io` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if mime_for(&file_name).is_none() {
            return Err(ValidationError::UnsupportedImage(file_name).into());
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes)?)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, ApiError> {
        Ok(reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime)?)
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_types() {
        assert_eq!(ImageUpload::new("a.png", vec![1]).unwrap().mime(), "image/png");
        assert_eq!(ImageUpload::new("b.JPG", vec![1]).unwrap().mime(), "image/jpeg");
        assert_eq!(ImageUpload::new("c.jpeg", vec![1]).unwrap().mime(), "image/jpeg");
        assert_eq!(ImageUpload::new("d.webp", vec![1]).unwrap().mime(), "image/webp");
    }

    #[test]
    fn test_rejects_other_types() {
        assert_eq!(
            ImageUpload::new("scan.gif", vec![1]).unwrap_err(),
            ValidationError::UnsupportedImage("scan.gif".to_string())
        );
        assert!(ImageUpload::new("noext", vec![1]).is_err());
    }

    #[test]
    fn test_rejects_empty_file() {
        assert_eq!(
            ImageUpload::new("a.png", Vec::new()).unwrap_err(),
            ValidationError::EmptyUpload
        );
    }

    #[tokio::test]
    async fn test_from_path_checks_extension_before_reading() {
        // the file does not exist; the extension check fails first
        let err = ImageUpload::from_path(Path::new("/nonexistent/receipt.txt"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::UnsupportedImage(_))
        ));
    }
}
