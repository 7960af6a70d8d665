//! Encrypted session management

use std::cell::Cell;
use std::path::{Path, PathBuf};
use log::warn;
use rusqlite::{Connection, ErrorCode};
use crate::crypto::MasterKey;
use crate::error::{CacheError, Result};
use super::executor::Executor;

/// Directives applied right after the key, in this order.
/// `foreign_keys` must be ON for cascading deletes.
pub const SESSION_PRAGMAS: &[&str] = &[
    "PRAGMA cipher_page_size = 4096",
    "PRAGMA cipher_use_hmac = ON",
    "PRAGMA cipher_memory_security = ON",
    "PRAGMA temp_store = MEMORY",
    "PRAGMA foreign_keys = ON",
    "PRAGMA journal_mode = WAL",
];

/// The single open connection to the encrypted cache file
pub struct Session {
    /// Path to the database file
    path: PathBuf,
    /// SQLite connection
    conn: Connection,
    /// Set while `Executor::transaction` is running
    in_transaction: Cell<bool>,
}

impl Session {
    /// Open and configure the cache file.
    ///
    /// The key is applied before any other directive; the session is
    /// verified with a trivial query before it is returned. Schema setup is
    /// left to the caller.
    pub fn open(path: &Path, key: &MasterKey) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| CacheError::OpenFailed(format!("{}: {}", path.display(), e)))?;

        conn.execute_batch(&format!("PRAGMA key = '{}'", key.to_hex()))
            .map_err(|e| CacheError::PragmaFailed {
                pragma: "PRAGMA key".to_string(),
                reason: e.to_string(),
            })?;

        require_cipher(cipher_version(&conn), cfg!(feature = "insecure-plaintext"))?;

        for pragma in SESSION_PRAGMAS {
            apply_pragma(&conn, pragma)?;
        }

        verify_encryption(&conn)?;

        Ok(Self {
            path: path.to_path_buf(),
            conn,
            in_transaction: Cell::new(false),
        })
    }

    /// Statement executor bound to this session
    pub fn executor(&self) -> Executor<'_> {
        Executor::new(&self.conn, &self.in_transaction)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the linked SQLite is SQLCipher
    pub fn is_encrypted(&self) -> bool {
        cipher_version(&self.conn).is_some()
    }

    /// Force a WAL checkpoint to write all data to the main database file
    ///
    /// Uses TRUNCATE mode which checkpoints all frames and truncates the WAL file.
    pub fn checkpoint(&self) -> Result<()> {
        apply_pragma(&self.conn, "PRAGMA wal_checkpoint(TRUNCATE)")
    }
}

/// SQLCipher version string; `None` on plain SQLite, which has no such pragma
fn cipher_version(conn: &Connection) -> Option<String> {
    conn.query_row("PRAGMA cipher_version", [], |row| row.get::<_, String>(0))
        .ok()
}

/// Plain SQLite accepts `PRAGMA key` and writes cleartext, so refuse it
/// unless plaintext was explicitly allowed at build time.
fn require_cipher(version: Option<String>, allow_plaintext: bool) -> Result<()> {
    match version {
        Some(_) => Ok(()),
        None if allow_plaintext => {
            warn!("SQLCipher not linked; the cache is stored unencrypted");
            Ok(())
        }
        None => Err(CacheError::PragmaFailed {
            pragma: "PRAGMA cipher_version".to_string(),
            reason: "linked SQLite has no encryption support".to_string(),
        }),
    }
}

/// A wrong key only surfaces once SQLite reads a page, which may happen
/// inside one of the directives; report it the same way as a failed
/// verification.
fn apply_pragma(conn: &Connection, pragma: &str) -> Result<()> {
    conn.execute_batch(pragma).map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::NotADatabase) => CacheError::EncryptionVerificationFailed(
            "Wrong key or corrupted database.".to_string(),
        ),
        _ => CacheError::PragmaFailed {
            pragma: pragma.to_string(),
            reason: e.to_string(),
        },
    })
}

fn verify_encryption(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
        .map(|_| ())
        .map_err(|e| {
            CacheError::EncryptionVerificationFailed(format!(
                "Wrong key or corrupted database. ({})",
                e
            ))
        })
}
