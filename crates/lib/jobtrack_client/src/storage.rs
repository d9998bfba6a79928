//! Durable session storage.
//!
//! A [`Session`] survives restarts through a [`SessionStorage`] backend.
//! [`FileStorage`] keeps it as a JSON document with the keys `token`, `user`
//! and `location`:
//!
//! ```json
//! {
//!   "token": "eyJhbGciOiJIUzI1NiJ9...",
//!   "user": { "id": "...", "name": "Ada", "email": "ada@example.com", "lastName": "lastName", "location": "my city" },
//!   "location": "my city"
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use jobtrack_core::models::api::AuthResponse;
use jobtrack_core::models::auth::User;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Authenticated session: profile, bearer token and last-used location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub location: String,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self {
            token: resp.token,
            user: resp.user,
            location: resp.location,
        }
    }
}

/// Backend that persists at most one session.
pub trait SessionStorage: Send + Sync {
    /// The stored session, if any.
    fn load(&self) -> Result<Option<Session>, ClientError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), ClientError>;

    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Session file on disk, written with owner-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// `<data dir>/jobtrack/session.json`, falling back to the working
    /// directory when the platform has no data dir.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jobtrack")
            .join("session.json")
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&contents).map_err(|e| {
            ClientError::Storage(format!(
                "corrupted session file '{}': {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten an existing file before
        // the token is written.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    session: Mutex<Option<Session>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use uuid::Uuid;

    use super::*;

    fn sample_session() -> Session {
        Session {
            token: "header.payload.signature".into(),
            user: User {
                id: Uuid::now_v7(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                last_name: "Lovelace".into(),
                location: "London".into(),
            },
            location: "London".into(),
        }
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = sample_session();

        FileStorage::new(&path).save(&session).unwrap();
        let loaded = FileStorage::new(&path).load().unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[test]
    fn file_uses_token_user_location_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&sample_session()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        let mut keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["location", "token", "user"]);
        assert_eq!(raw["user"]["lastName"], "Lovelace");
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&sample_session()).unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());
        assert_eq!(storage.load().unwrap(), None);
        storage.clear().unwrap();
    }

    #[test]
    fn corrupted_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let err = FileStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&sample_session()).unwrap();
        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_readable_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let session = sample_session();
        let storage = FileStorage::new(path.clone());
        storage.save(&session).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(storage.load().unwrap(), Some(session));
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), None);
        let session = sample_session();
        storage.save(&session).unwrap();
        assert_eq!(storage.load().unwrap(), Some(session));
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
