// Bearer-token session shared by every outgoing request.
//
// The client reads the token on each call and clears it when the server
// answers 401. Persistence is the implementor's concern; `aegis-config`
// ships a file-backed variant.

use std::fmt::Debug;
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};

/// Holder of the bearer token.
pub trait Session: Send + Sync + Debug {
    /// Current token, if logged in.
    fn token(&self) -> Option<SecretString>;

    /// Replace the token (after a successful login).
    fn set_token(&self, token: SecretString);

    /// Forget the token (logout or authorization failure).
    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// In-process session with no persistence.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<SecretString>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl Session for MemorySession {
    fn token(&self) -> Option<SecretString> {
        let guard = self
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }

    fn set_token(&self, token: SecretString) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(token);
    }

    fn clear(&self) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let session = MemorySession::new();
        assert!(!session.is_authenticated());

        session.set_token(SecretString::from("abc".to_owned()));
        assert_eq!(
            session.token().map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );

        session.clear();
        assert!(session.token().is_none());
    }
}
