//! Storage for the bearer credential. The credential is opaque to the client: no
//! expiry or signature is tracked here, the backend alone decides validity.
//! Values are held as `SecretString` so they never show up in `Debug` output.

use crate::api::ClientError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};
use tracing::{debug, warn};

/// Key under which the credential is persisted.
pub const TOKEN_KEY: &str = "token";

const SESSION_DIR: &str = "guardian-admin";
const SESSION_FILE: &str = "session.json";

pub trait TokenStore: Send + Sync {
    /// Stores the credential, replacing any previous one.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if the credential cannot be persisted.
    fn set(&self, credential: SecretString) -> Result<(), ClientError>;

    /// Current credential, if any.
    fn get(&self) -> Option<SecretString>;

    /// Drops the credential.
    ///
    /// # Errors
    /// Returns `ClientError::Storage` if persisted state cannot be removed.
    fn clear(&self) -> Result<(), ClientError>;

    fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

/// Credential kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credential: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, credential: SecretString) -> Result<(), ClientError> {
        let mut guard = self
            .credential
            .write()
            .map_err(|_| ClientError::Storage("token lock poisoned".to_string()))?;
        *guard = Some(credential);
        Ok(())
    }

    fn get(&self) -> Option<SecretString> {
        self.credential.read().ok().and_then(|guard| guard.clone())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut guard = self
            .credential
            .write()
            .map_err(|_| ClientError::Storage("token lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Credential persisted as `{"token": "..."}` so it survives between CLI runs.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/guardian-admin/session.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SESSION_DIR).join(SESSION_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, credential: SecretString) -> Result<(), ClientError> {
        let stored = StoredSession {
            token: credential.expose_secret().to_string(),
        };
        let contents = serde_json::to_string(&stored)
            .map_err(|err| ClientError::Storage(format!("Failed to encode session: {err}")))?;
        self.write(&contents).map_err(|err| {
            ClientError::Storage(format!(
                "Failed to write session file {}: {err}",
                self.path.display()
            ))
        })?;
        debug!(path = %self.path.display(), "session stored");
        Ok(())
    }

    fn get(&self) -> Option<SecretString> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(path = %self.path.display(), "failed to read session file: {err}");
                }
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) if !stored.token.trim().is_empty() => {
                Some(SecretString::from(stored.token))
            }
            Ok(_) => None,
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring malformed session file: {err}");
                None
            }
        }
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::Storage(format!(
                "Failed to remove session file {}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
