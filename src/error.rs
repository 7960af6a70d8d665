//! Error types for the local cache engine

use rusqlite::ErrorCode;
use thiserror::Error;

/// Main error type for cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// The database file could not be opened
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    /// The secure random generator could not produce key material
    #[error("Failed to generate encryption key: {0}")]
    KeyGenerationFailed(String),

    /// The master key could not be written to the secret store
    #[error("Failed to save encryption key to secret store: {0}")]
    KeychainSaveFailed(String),

    /// The master key could not be read from the secret store
    #[error("Failed to read encryption key from secret store: {0}")]
    KeychainReadFailed(String),

    /// A configuration directive was rejected
    #[error("PRAGMA failed ({pragma}): {reason}")]
    PragmaFailed { pragma: String, reason: String },

    /// Wrong key or corrupted file; the two cannot be told apart
    #[error("Encryption verification failed: {0}")]
    EncryptionVerificationFailed(String),

    /// Statement preparation or row iteration failed
    #[error("Query failed: {sql}\nError: {reason}")]
    QueryFailed {
        sql: String,
        reason: String,
        code: Option<ErrorCode>,
    },

    /// A statement did not run to completion
    #[error("Execute failed: {sql}\nError: {reason}")]
    ExecuteFailed {
        sql: String,
        reason: String,
        code: Option<ErrorCode>,
    },

    /// A bound value is outside text / 32-bit integer / real / null
    #[error("Unsupported parameter type: {0}")]
    UnsupportedParameterType(String),

    /// Feature deliberately left unimplemented
    #[error("Feature not implemented: {0}")]
    NotImplemented(String),

    /// `execute_transaction` was called while a transaction is open
    #[error("Nested transactions are not supported")]
    NestedTransaction,

    /// Schema creation or migration aborted; the stored version is unchanged
    #[error("Schema migration from version {from} to {to} failed: {source}")]
    MigrationFailed {
        from: u32,
        to: u32,
        #[source]
        source: Box<CacheError>,
    },

    /// The file was written by a newer schema than this build understands
    #[error("Schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },

    /// Subscription or observer arguments could not be (de)serialized
    #[error("Invalid query arguments: {0}")]
    InvalidArgs(#[from] serde_json::Error),

    /// A stored date is not an RFC 3339 timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl CacheError {
    pub(crate) fn query_failed(sql: &str, err: &rusqlite::Error) -> Self {
        CacheError::QueryFailed {
            sql: sql.to_string(),
            reason: err.to_string(),
            code: err.sqlite_error_code(),
        }
    }

    pub(crate) fn execute_failed(sql: &str, err: &rusqlite::Error) -> Self {
        CacheError::ExecuteFailed {
            sql: sql.to_string(),
            reason: err.to_string(),
            code: err.sqlite_error_code(),
        }
    }

    /// Fill in the statement text for errors raised while decoding a row.
    pub(crate) fn with_sql(self, statement: &str) -> Self {
        match self {
            CacheError::QueryFailed { sql, reason, code } if sql.is_empty() => CacheError::QueryFailed {
                sql: statement.to_string(),
                reason,
                code,
            },
            other => other,
        }
    }

    /// The SQLite result code behind a failed statement, if any
    pub fn sqlite_code(&self) -> Option<ErrorCode> {
        match self {
            CacheError::QueryFailed { code, .. } | CacheError::ExecuteFailed { code, .. } => *code,
            CacheError::MigrationFailed { source, .. } => source.sqlite_code(),
            _ => None,
        }
    }

    /// True for UNIQUE, PRIMARY KEY and FOREIGN KEY violations
    pub fn is_constraint_violation(&self) -> bool {
        self.sqlite_code() == Some(ErrorCode::ConstraintViolation)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::query_failed("", &err)
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
