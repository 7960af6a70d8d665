//! # edgecache
//!
//! Encrypted local cache for the database administration console.
//!
//! ## Features
//!
//! - Whole-file encryption (SQLCipher) with a 256-bit master key kept in the
//!   platform keychain
//! - Versioned schema with forward migrations
//! - Atomic transactions with rollback on error
//! - Connection profiles, subscriptions, query history, favorites and
//!   observer registrations, with cascading deletes
//!
//! ## Example
//!
//! ```no_run
//! use edgecache::{AuthMode, CacheStore, ConnectionProfile, StoreConfig};
//!
//! let store = CacheStore::with_keyring(StoreConfig::from_env());
//! store.initialize().unwrap();
//!
//! let profile = ConnectionProfile::new("Staging", "db-staging", AuthMode::OnlinePlayground);
//! store.insert_profile(&profile).unwrap();
//!
//! store.record_history("db-staging", "SELECT * FROM cars").unwrap();
//! for entry in store.history("db-staging", 10).unwrap() {
//!     println!("{}: {}", entry.created_date, entry.query);
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod store;
pub mod utils;

// Re-export main types
pub use config::{StorageMode, StoreConfig};
pub use crypto::{KeyProvider, KeyringSecretStore, MasterKey, MemorySecretStore, SecretStore};
pub use database::models::{
    AuthMode, CacheStats, ConnectionProfile, FavoriteEntry, HistoryEntry, ObserverMetadata, Subscription,
};
pub use database::{Executor, SqlParam};
pub use error::{CacheError, Result};
pub use store::CacheStore;

/// Schema version written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Database filename
pub const DATABASE_FILENAME: &str = "ditto_encrypted.db";

/// Cache directory for normal runs
pub const PRODUCTION_CACHE_DIR: &str = "ditto_cache";

/// Cache directory for UI test runs
pub const TEST_CACHE_DIR: &str = "ditto_cache_test";

/// Process argument that selects the test cache directory
pub const TEST_MODE_ARGUMENT: &str = "UI-TESTING";

/// Secret store service holding the master key
pub const KEY_SERVICE: &str = "live.ditto.EdgeStudio.sqlcipher";

/// Secret store account holding the master key
pub const KEY_ACCOUNT: &str = "sqlcipher_master_key";

/// Default number of history entries returned
pub const DEFAULT_HISTORY_LIMIT: u32 = 1000;
