//! Database schema definitions
//!
//! Table and column names are shared with existing cache files and must not
//! change.

/// SQL to create the connection profiles table (metadata only, credentials
/// stay in the secret store)
pub const CREATE_DATABASE_CONFIGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS databaseConfigs (
    _id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    databaseId TEXT NOT NULL UNIQUE,
    mode TEXT NOT NULL,
    allowUntrustedCerts INTEGER DEFAULT 0,
    isBluetoothLeEnabled INTEGER DEFAULT 1,
    isLanEnabled INTEGER DEFAULT 1,
    isAwdlEnabled INTEGER DEFAULT 1,
    isCloudSyncEnabled INTEGER DEFAULT 1
)
"#;

/// SQL to create the subscriptions table
pub const CREATE_SUBSCRIPTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    _id TEXT PRIMARY KEY,
    databaseId TEXT NOT NULL,
    name TEXT NOT NULL,
    query TEXT NOT NULL,
    args TEXT,
    FOREIGN KEY(databaseId) REFERENCES databaseConfigs(databaseId) ON DELETE CASCADE
)
"#;

/// SQL to create the query history table
pub const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS history (
    _id TEXT PRIMARY KEY,
    databaseId TEXT NOT NULL,
    query TEXT NOT NULL,
    createdDate TEXT NOT NULL,
    FOREIGN KEY(databaseId) REFERENCES databaseConfigs(databaseId) ON DELETE CASCADE
)
"#;

/// SQL to create the favorites table
pub const CREATE_FAVORITES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS favorites (
    _id TEXT PRIMARY KEY,
    databaseId TEXT NOT NULL,
    query TEXT NOT NULL,
    createdDate TEXT NOT NULL,
    FOREIGN KEY(databaseId) REFERENCES databaseConfigs(databaseId) ON DELETE CASCADE
)
"#;

/// SQL to create the observer registrations table
pub const CREATE_OBSERVABLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS observables (
    _id TEXT PRIMARY KEY,
    databaseId TEXT NOT NULL,
    name TEXT NOT NULL,
    query TEXT NOT NULL,
    args TEXT,
    isActive INTEGER DEFAULT 1,
    lastUpdated TEXT,
    FOREIGN KEY(databaseId) REFERENCES databaseConfigs(databaseId) ON DELETE CASCADE
)
"#;

pub const CREATE_SUBSCRIPTIONS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_databaseId ON subscriptions(databaseId)";

pub const CREATE_HISTORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_history_databaseId ON history(databaseId)";

/// Serves the newest-first history listing
pub const CREATE_HISTORY_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_history_databaseId_date ON history(databaseId, createdDate DESC)";

pub const CREATE_FAVORITES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_favorites_databaseId ON favorites(databaseId)";

pub const CREATE_OBSERVABLES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_observables_databaseId ON observables(databaseId)";

/// All table creation statements in order (parent table first)
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_DATABASE_CONFIGS_TABLE,
    CREATE_SUBSCRIPTIONS_TABLE,
    CREATE_HISTORY_TABLE,
    CREATE_FAVORITES_TABLE,
    CREATE_OBSERVABLES_TABLE,
];

/// All index creation statements
pub const CREATE_ALL_INDEXES: &[&str] = &[
    CREATE_SUBSCRIPTIONS_INDEX,
    CREATE_HISTORY_INDEX,
    CREATE_HISTORY_DATE_INDEX,
    CREATE_FAVORITES_INDEX,
    CREATE_OBSERVABLES_INDEX,
];
