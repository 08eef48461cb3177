//! Token persistence via the OS keyring
//!
//! Values are stored in the operating system's native credential store
//! (Keychain on macOS, Secret Service on Linux, Windows Credential Manager on
//! Windows). The keyring is stateless; [`KeyringTokenStore`] is a zero-field
//! struct that acts as a namespaced accessor.

use crate::error::{ItineraError, Result};
use crate::session::TokenPersistence;

/// Stateless accessor for the OS native keyring.
///
/// Each key is stored under its own service name so that entries written by
/// other applications sharing the keyring cannot collide with ours.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use itinera::session::{KeyringTokenStore, SessionContext, SessionToken};
///
/// let session = SessionContext::new(Arc::new(KeyringTokenStore), "token");
/// session.save(&SessionToken::new("abc123")).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    /// Builds the keyring service name for the given storage key.
    fn service_name(key: &str) -> String {
        format!("itinera-{}", key)
    }

    fn entry(key: &str) -> Result<keyring::Entry> {
        let service = Self::service_name(key);
        Ok(keyring::Entry::new(&service, key).map_err(ItineraError::Keyring)?)
    }
}

impl TokenPersistence for KeyringTokenStore {
    /// Returns `Ok(None)` when nothing has been saved under `key`, so callers
    /// can tell "not logged in yet" apart from a genuine keyring failure.
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ItineraError::Keyring(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .map_err(ItineraError::Keyring)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ItineraError::Keyring(e).into()),
        }
    }
}
