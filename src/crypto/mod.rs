//! Key management for the encrypted cache
//!
//! The cache file is encrypted with a single 256-bit master key held in a
//! secret store. This module owns generating, persisting and loading it.

mod key;
mod provider;
mod secret_store;

pub use key::{MasterKey, KEY_LENGTH, KEY_HEX_LENGTH};
pub use provider::KeyProvider;
pub use secret_store::{SecretStore, KeyringSecretStore, MemorySecretStore};
