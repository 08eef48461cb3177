//! Session token store
//!
//! The session token is the only client state that outlives a single
//! request/response cycle. It is held behind a [`SessionContext`] that is
//! passed explicitly to every request-issuing function, and persisted through
//! an injected [`TokenPersistence`] backend:
//!
//! - [`file::FileTokenStore`] -- JSON key/value document in the user data
//!   directory (default)
//! - [`keyring_store::KeyringTokenStore`] -- OS native credential store
//! - [`memory::MemoryTokenStore`] -- process-local, used by tests and
//!   ephemeral sessions
//!
//! Tokens are opaque: they are never inspected, validated, or expired on the
//! client.

use std::fmt;
use std::sync::Arc;

use crate::config::{SessionBackend, SessionConfig};
use crate::error::Result;

pub mod file;
pub mod keyring_store;
pub mod memory;

pub use file::FileTokenStore;
pub use keyring_store::KeyringTokenStore;
pub use memory::MemoryTokenStore;

/// Opaque authentication credential issued at login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string exactly as the backend issued it
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for request headers
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Key/value persistence used by the session store.
///
/// Implementations are synchronous: a read followed by a write from one
/// handler cannot interleave with another handler's access.
pub trait TokenPersistence: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`, or `None` if nothing was saved.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Explicit session handle passed to the dispatcher and renderer.
///
/// # Examples
///
/// ```
/// use itinera::session::{SessionContext, SessionToken};
///
/// let session = SessionContext::in_memory();
/// assert!(session.load().unwrap().is_none());
///
/// session.save(&SessionToken::new("abc123")).unwrap();
/// assert_eq!(session.load().unwrap().unwrap().as_str(), "abc123");
/// ```
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenPersistence>,
    key: String,
}

impl SessionContext {
    /// Default key the token is stored under
    pub const DEFAULT_KEY: &'static str = "token";

    /// Create a session over an arbitrary persistence backend
    pub fn new(store: Arc<dyn TokenPersistence>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Session backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()), Self::DEFAULT_KEY)
    }

    /// Build the session described by the configuration.
    ///
    /// `ephemeral` forces the memory backend regardless of the configured
    /// one, so nothing is read from or written to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend cannot determine its location.
    pub fn from_config(config: &SessionConfig, ephemeral: bool) -> Result<Self> {
        let backend = if ephemeral {
            SessionBackend::Memory
        } else {
            config.backend
        };

        let store: Arc<dyn TokenPersistence> = match backend {
            SessionBackend::Memory => Arc::new(MemoryTokenStore::new()),
            SessionBackend::Keyring => Arc::new(KeyringTokenStore),
            SessionBackend::File => match &config.file_path {
                Some(path) => Arc::new(FileTokenStore::with_path(path)),
                None => Arc::new(FileTokenStore::new()?),
            },
        };

        tracing::debug!(?backend, key = %config.token_key, "Session store initialized");
        Ok(Self::new(store, config.token_key.clone()))
    }

    /// Persist the token, replacing any previously saved one.
    pub fn save(&self, token: &SessionToken) -> Result<()> {
        self.store.set(&self.key, token.as_str())?;
        tracing::debug!(key = %self.key, "Session token saved");
        Ok(())
    }

    /// Load the previously saved token, if any.
    pub fn load(&self) -> Result<Option<SessionToken>> {
        Ok(self.store.get(&self.key)?.map(SessionToken))
    }

    /// Forget the saved token.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        tracing::debug!(key = %self.key, "Session token cleared");
        Ok(())
    }
}
