//! Main cache store API
//!
//! `CacheStore` owns the storage configuration, the key provider and the one
//! session to the encrypted file. Every public operation goes through it.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;
use log::info;
use parking_lot::ReentrantMutex;
use crate::config::StoreConfig;
use crate::crypto::{KeyProvider, KeyringSecretStore, SecretStore};
use crate::database::migrations;
use crate::database::queries::{self, CacheTable};
use crate::database::{CacheStats, Executor, Session};
use crate::error::{CacheError, Result};

/// Encrypted local cache
///
/// The session is opened lazily on first use (or eagerly by
/// [`CacheStore::initialize`]) and kept for the lifetime of the store.
/// Statements from all threads are serialized; share the store with
/// `Arc<CacheStore>`.
pub struct CacheStore {
    /// Where the cache file lives
    pub(crate) config: StoreConfig,
    /// Master key source
    pub(crate) keys: KeyProvider,
    /// Open session, `None` until first use. Re-entrant so store calls made
    /// from inside a transaction block join that transaction.
    pub(crate) session: ReentrantMutex<RefCell<Option<Session>>>,
}

impl CacheStore {
    /// Store backed by the given secret store
    pub fn new(config: StoreConfig, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            config,
            keys: KeyProvider::new(secrets),
            session: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    /// Store backed by the platform keychain
    pub fn with_keyring(config: StoreConfig) -> Self {
        Self::new(config, Arc::new(KeyringSecretStore))
    }

    /// Open the session and bring the schema up to date.
    ///
    /// Calling it again on an open store is a no-op.
    pub fn initialize(&self) -> Result<()> {
        self.with_executor(|_| Ok(()))
    }

    /// True once the session is open
    pub fn is_initialized(&self) -> bool {
        let guard = self.session.lock();
        guard.try_borrow().map(|slot| slot.is_some()).unwrap_or(true)
    }

    /// Path of the cache file
    pub fn path(&self) -> PathBuf {
        self.config.database_path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run `f` against the open session, opening it first if needed
    pub fn with_executor<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Executor<'_>) -> Result<T>,
    {
        self.with_session(|session| f(&session.executor()))
    }

    fn with_session<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Session) -> Result<T>,
    {
        let guard = self.session.lock();

        if guard.borrow().is_none() {
            let session = self.open_session()?;
            *guard.borrow_mut() = Some(session);
        }

        let slot = guard.borrow();
        let session = slot
            .as_ref()
            .ok_or_else(|| CacheError::InvalidOperation("Session not open".to_string()))?;
        f(session)
    }

    fn open_session(&self) -> Result<Session> {
        let key = self.keys.get_or_create_key()?;
        let path = self.config.prepare_database_path()?;
        let session = Session::open(&path, &key)?;
        let version = migrations::prepare_schema(&session.executor())?;
        info!("Cache opened at {} (schema version {})", path.display(), version);
        Ok(session)
    }

    /// Run `block` in one transaction.
    ///
    /// Commits on success; on error everything written by the block is
    /// rolled back and the block's error is returned. Store operations
    /// called from inside the block take part in the transaction; a nested
    /// `execute_transaction` fails with `NestedTransaction`.
    pub fn execute_transaction<T, F>(&self, block: F) -> Result<T>
    where
        F: FnOnce(&Executor<'_>) -> Result<T>,
    {
        self.with_executor(|ex| ex.transaction(block))
    }

    /// Run `block` atomically, joining the caller's transaction if one is open
    pub(crate) fn atomically<T, F>(&self, block: F) -> Result<T>
    where
        F: FnOnce(&Executor<'_>) -> Result<T>,
    {
        self.with_executor(|ex| {
            if ex.in_transaction() {
                block(ex)
            } else {
                ex.transaction(block)
            }
        })
    }

    /// Stored schema version
    pub fn schema_version(&self) -> Result<u32> {
        self.with_executor(migrations::get_schema_version)
    }

    /// Row counts per table and the on-disk size of the cache (main file
    /// plus write-ahead log)
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = self.with_executor(|ex| {
            Ok(CacheStats {
                profiles: queries::count_rows(ex, CacheTable::Profiles)?,
                subscriptions: queries::count_rows(ex, CacheTable::Subscriptions)?,
                history: queries::count_rows(ex, CacheTable::History)?,
                favorites: queries::count_rows(ex, CacheTable::Favorites)?,
                observers: queries::count_rows(ex, CacheTable::Observers)?,
                file_size_bytes: 0,
            })
        })?;

        let path = self.path();
        let wal_size = match std::fs::metadata(sidecar(&path, "-wal")) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        stats.file_size_bytes = std::fs::metadata(&path)?.len() + wal_size;
        Ok(stats)
    }

    /// Rebuild the file to reclaim free pages. Not allowed inside a
    /// transaction.
    pub fn vacuum(&self) -> Result<()> {
        self.with_session(|session| {
            let ex = session.executor();
            if ex.in_transaction() {
                return Err(CacheError::InvalidOperation(
                    "VACUUM cannot run inside a transaction".to_string(),
                ));
            }
            ex.execute("VACUUM", &[])?;
            session.checkpoint()?;
            info!("Cache vacuumed");
            Ok(())
        })
    }

    /// True when the file is encrypted at rest (SQLCipher build)
    pub fn is_encrypted(&self) -> Result<bool> {
        self.with_session(|session| Ok(session.is_encrypted()))
    }

    /// Close the session and delete the cache file with its WAL and shared
    /// memory files. The next operation starts from an empty schema with
    /// the same master key.
    pub fn reset(&self) -> Result<()> {
        let guard = self.session.lock();
        let mut slot = guard.try_borrow_mut().map_err(|_| {
            CacheError::InvalidOperation("Cannot reset the cache while it is in use".to_string())
        })?;

        // Closes the connection before the files go away
        *slot = None;
        drop(slot);

        let path = self.path();
        for file in [path.clone(), sidecar(&path, "-wal"), sidecar(&path, "-shm")] {
            match std::fs::remove_file(&file) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!("Cache reset at {}", path.display());
        Ok(())
    }
}

/// `{path}{suffix}`, e.g. `ditto_encrypted.db-wal`
fn sidecar(path: &std::path::Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
