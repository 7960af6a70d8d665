//! Secret store backends
//!
//! The cache only ever keeps one secret here: the hex master key. The trait
//! lets the OS keychain be swapped for another backend without touching the
//! storage engine.

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use crate::error::{CacheError, Result};

/// Minimal secure key-value store keyed by (service, account)
pub trait SecretStore: Send + Sync {
    /// Read a secret, `None` when no entry exists
    fn get(&self, service: &str, account: &str) -> Result<Option<String>>;

    /// Create or replace a secret
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()>;

    /// Remove a secret; removing a missing entry is not an error
    fn delete(&self, service: &str, account: &str) -> Result<()>;
}

/// OS credential store: macOS Keychain, Windows Credential Manager, or on
/// Linux the kernel keyring backed by Secret Service.
///
/// The bare kernel keyring forgets entries at reboot or logout, after which
/// the cache could never be decrypted again; the `linux-native-sync-persistent`
/// backend writes every entry through to Secret Service and reloads it from
/// there. Entries are created with the platform default accessibility, which
/// on Apple platforms is "after first unlock".
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(service: &str, account: &str) -> std::result::Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(service, account)
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        let entry = Self::entry(service, account)
            .map_err(|e| CacheError::KeychainReadFailed(e.to_string()))?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CacheError::KeychainReadFailed(e.to_string())),
        }
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        let entry = Self::entry(service, account)
            .map_err(|e| CacheError::KeychainSaveFailed(e.to_string()))?;
        entry
            .set_password(secret)
            .map_err(|e| CacheError::KeychainSaveFailed(e.to_string()))
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        let entry = Self::entry(service, account)
            .map_err(|e| CacheError::KeychainSaveFailed(e.to_string()))?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CacheError::KeychainSaveFailed(e.to_string())),
        }
    }
}

/// Process-local secret store for tests and throwaway runs.
///
/// Clones share the same entries, so handing a clone to a second store
/// behaves like reopening the same installation.
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    entries: Arc<Mutex<HashMap<(String, String), String>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored secrets
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, account: &str) -> Result<Option<String>> {
        let entries = self.entries.lock();
        Ok(entries.get(&(service.to_string(), account.to_string())).cloned())
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        self.entries
            .lock()
            .insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }

    fn delete(&self, service: &str, account: &str) -> Result<()> {
        self.entries.lock().remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}
