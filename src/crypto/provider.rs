//! Master key lifecycle

use std::sync::Arc;
use log::info;
use parking_lot::Mutex;
use crate::error::{CacheError, Result};
use super::key::MasterKey;
use super::secret_store::SecretStore;
use crate::{KEY_ACCOUNT, KEY_SERVICE};

/// Loads the master key from a secret store, creating it on first use.
///
/// Once loaded the key stays in memory for the lifetime of the provider.
pub struct KeyProvider {
    store: Arc<dyn SecretStore>,
    service: String,
    account: String,
    cached: Mutex<Option<MasterKey>>,
}

impl KeyProvider {
    /// Provider using the fixed installation-wide service and account
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self::with_identifiers(store, KEY_SERVICE, KEY_ACCOUNT)
    }

    /// Provider with custom service/account names
    pub fn with_identifiers(store: Arc<dyn SecretStore>, service: &str, account: &str) -> Self {
        Self {
            store,
            service: service.to_string(),
            account: account.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Return the stored key, generating and saving a new one if none exists
    pub fn get_or_create_key(&self) -> Result<MasterKey> {
        let mut cached = self.cached.lock();
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        let key = match self.store.get(&self.service, &self.account)? {
            Some(encoded) => MasterKey::from_hex(&encoded)?,
            None => {
                info!("Generating new cache encryption key");
                let key = MasterKey::generate()?;
                self.store.set(&self.service, &self.account, &key.to_hex())?;
                info!("Cache encryption key generated and saved to secret store");
                key
            }
        };

        *cached = Some(key.clone());
        Ok(key)
    }

    /// Re-encrypt the store under a new key.
    ///
    /// Not supported: always fails so callers never assume a rotation happened.
    pub fn rotate_key(&self) -> Result<()> {
        Err(CacheError::NotImplemented("Key rotation".to_string()))
    }
}
