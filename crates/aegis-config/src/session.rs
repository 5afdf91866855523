// File-backed bearer-token session
//
// Keeps the token in memory and mirrors every change to a per-profile
// file, so a login survives between CLI invocations. Disk failures are
// logged, never raised: the in-memory token stays authoritative.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use aegis_api::Session;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    token: RwLock<Option<SecretString>>,
}

impl FileSession {
    /// Open the session stored at `path`; a missing or empty file means
    /// logged out.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_owned())
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read session file");
                None
            }
        };
        debug!(path = %path.display(), logged_in = token.is_some(), "session opened");
        Self {
            path,
            token: RwLock::new(token),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl Session for FileSession {
    fn token(&self) -> Option<SecretString> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }

    fn set_token(&self, token: SecretString) {
        if let Err(e) = self.persist(token.expose_secret()) {
            warn!(path = %self.path.display(), error = %e, "cannot write session file");
        }
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token);
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "cannot remove session file"),
        }
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
