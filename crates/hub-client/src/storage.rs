//! Durable storage for the session token.
//!
//! A single entry keyed [`AUTH_TOKEN_KEY`] holds the raw token string and is
//! absent while logged out. [`FileTokenStore`] keeps it in a file with
//! restricted permissions (0600); [`MemoryTokenStore`] keeps it in a shared
//! in-memory slot for tests and throwaway sessions.

use crate::errors::StorageError;
use common::secret::{ExposeSecret, SecretString};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Fixed key (file name) under which the token is persisted.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable backing store for the session token.
///
/// Implementations are synchronous: a write has completed by the time the
/// call returns.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be read.
    fn load(&self) -> Result<Option<SecretString>, StorageError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be written.
    fn save(&self, token: &SecretString) -> Result<(), StorageError>;

    /// Remove the persisted token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Token store backed by a single file in the client's storage directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store that keeps the token at `<dir>/authToken`.
    ///
    /// The directory is created lazily on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(AUTH_TOKEN_KEY),
        }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SecretString>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io("read", &self.path, e)),
        };

        // Stored verbatim; only an empty file means logged out
        if contents.is_empty() {
            return Ok(None);
        }

        debug!(path = %self.path.display(), "Loaded persisted token");
        Ok(Some(SecretString::from(contents)))
    }

    fn save(&self, token: &SecretString) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::io("create directory", parent, e))?;
            }
        }

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .map_err(|e| StorageError::io("open", &self.path, e))?;
            file.write_all(token.expose_secret().as_bytes())
                .map_err(|e| StorageError::io("write", &self.path, e))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .map_err(|e| StorageError::io("open", &self.path, e))?;
            file.write_all(token.expose_secret().as_bytes())
                .map_err(|e| StorageError::io("write", &self.path, e))?;
        }

        debug!(path = %self.path.display(), "Persisted token");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed persisted token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("remove", &self.path, e)),
        }
    }
}

/// In-memory token store.
///
/// Clones share the same slot, so a test can keep one handle to inspect what
/// the session persisted while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<SecretString>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(SecretString::from(token)))),
        }
    }

    /// Plain copy of the stored token, for assertions.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.expose_secret().to_string())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));

        store.save(&SecretString::from("abc123")).unwrap();

        assert_eq!(store.path().file_name().unwrap(), AUTH_TOKEN_KEY);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "abc123");
        let loaded = store.load().unwrap().expect("token should be present");
        assert_eq!(loaded.expose_secret(), "abc123");
    }

    #[test]
    fn test_file_store_save_overwrites_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.save(&SecretString::from("a-much-longer-first-token")).unwrap();
        store.save(&SecretString::from("short")).unwrap();

        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "short");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.save(&SecretString::from("abc123")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.save(&SecretString::from("abc123")).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_none());

        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_empty_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        fs::write(store.path(), "").unwrap();

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_loads_token_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.save(&SecretString::from(" abc123 ")).unwrap();

        assert_eq!(store.load().unwrap().unwrap().expose_secret(), " abc123 ");
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let observer = store.clone();

        store.save(&SecretString::from("xyz")).unwrap();
        assert_eq!(observer.stored_token().as_deref(), Some("xyz"));

        store.clear().unwrap();
        assert_eq!(observer.stored_token(), None);
    }

    #[test]
    fn test_memory_store_debug_redacts_token() {
        let store = MemoryTokenStore::with_token("very-secret-token");
        let debug = format!("{store:?}");
        assert!(!debug.contains("very-secret-token"));
    }
}
