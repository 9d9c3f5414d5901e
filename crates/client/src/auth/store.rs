//! Token persistence.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Fixed storage key of the login token.
pub const TOKEN_KEY: &str = "posleep_token";

/// Where the login token lives between runs.
pub trait TokenStore: Send + Sync {
    /// Read the saved token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> std::io::Result<Option<SecretString>>;

    /// Save `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> std::io::Result<()>;

    /// Remove the saved token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> std::io::Result<()>;
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> std::io::Result<Option<SecretString>> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// File-backed store: one file named [`TOKEN_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token under `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(TOKEN_KEY),
        }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> std::io::Result<Option<SecretString>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_string())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token.expose_secret())?;
        debug!(path = %self.path.display(), "Saved login token");
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared login token");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("posleep-store-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::default();
        assert!(store.load().unwrap().is_none());
        store.save(&SecretString::from("abc")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "abc");
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = FileTokenStore::in_dir(&dir);
        assert!(store.path().ends_with(TOKEN_KEY));
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("token-1")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "token-1");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // clearing twice is fine
        store.clear().unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_ignores_blank_file() {
        let dir = scratch_dir("blank");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TOKEN_KEY), "  \n").unwrap();
        assert!(FileTokenStore::in_dir(&dir).load().unwrap().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
