//! Schema versioning and forward migrations
//!
//! The version lives in `PRAGMA user_version`. A fresh file (version 0) gets
//! the full schema; older files run every migration step above their
//! version in ascending order. Creation and the whole migration chain each
//! run in a single transaction, so a failure leaves the file at its old
//! version.

use log::info;
use rusqlite::params;
use crate::error::{CacheError, Result};
use crate::SCHEMA_VERSION;
use super::executor::Executor;
use super::schema;

/// One forward step of the schema
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version reached after this step
    pub version: u32,
    pub description: &'static str,
    /// Idempotent statements (`IF NOT EXISTS` style)
    pub statements: &'static [&'static str],
}

/// Migration steps after the initial schema, ascending by version.
/// Empty while the schema is at version 1.
pub const MIGRATIONS: &[Migration] = &[];

/// Read the stored schema version (0 for a fresh file)
pub fn get_schema_version(ex: &Executor<'_>) -> Result<u32> {
    let version = ex.query_optional("PRAGMA user_version", params![], |row| {
        Ok(row.get::<_, i64>(0)?)
    })?;

    match version {
        None => Ok(0),
        Some(v) => u32::try_from(v).map_err(|_| {
            CacheError::InvalidOperation(format!("stored schema version {} is invalid", v))
        }),
    }
}

/// Store a new schema version. The version never decreases.
pub fn set_schema_version(ex: &Executor<'_>, version: u32) -> Result<()> {
    let current = get_schema_version(ex)?;
    if version < current {
        return Err(CacheError::InvalidOperation(format!(
            "schema version cannot go from {} back to {}",
            current, version
        )));
    }
    ex.execute(&format!("PRAGMA user_version = {}", version), params![])?;
    Ok(())
}

/// Bring the schema to the current version
pub fn prepare_schema(ex: &Executor<'_>) -> Result<u32> {
    prepare_schema_to(ex, SCHEMA_VERSION, MIGRATIONS)
}

/// Bring the schema to `target` using `migrations`
pub fn prepare_schema_to(ex: &Executor<'_>, target: u32, migrations: &[Migration]) -> Result<u32> {
    let found = get_schema_version(ex)?;

    if found == 0 {
        create_schema(ex, target)?;
    } else if found < target {
        migrate_schema(ex, found, target, migrations)?;
    } else if found > target {
        return Err(CacheError::SchemaTooNew { found, supported: target });
    }

    Ok(target)
}

/// Creates the initial database schema
fn create_schema(ex: &Executor<'_>, target: u32) -> Result<()> {
    info!("Creating cache schema version {}", target);

    ex.transaction(|tx| {
        for sql in schema::CREATE_ALL_TABLES.iter().chain(schema::CREATE_ALL_INDEXES) {
            tx.execute(sql, params![])?;
        }
        set_schema_version(tx, target)
    })
    .map_err(|e| CacheError::MigrationFailed { from: 0, to: target, source: Box::new(e) })?;

    info!("Cache schema created successfully");
    Ok(())
}

/// Run every step with `from < version <= to`, in order, in one transaction
fn migrate_schema(ex: &Executor<'_>, from: u32, to: u32, migrations: &[Migration]) -> Result<()> {
    info!("Migrating cache schema from version {} to {}", from, to);

    let wrap = |e: CacheError| CacheError::MigrationFailed { from, to, source: Box::new(e) };

    if migrations.windows(2).any(|pair| pair[0].version >= pair[1].version) {
        return Err(wrap(CacheError::InvalidOperation(
            "migration steps are not in ascending version order".to_string(),
        )));
    }

    ex.transaction(|tx| {
        for step in migrations.iter().filter(|m| m.version > from && m.version <= to) {
            info!("Applying cache migration {}: {}", step.version, step.description);
            for sql in step.statements {
                tx.execute(sql, params![])?;
            }
        }
        set_schema_version(tx, to)
    })
    .map_err(wrap)?;

    info!("Cache schema migration complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use rusqlite::Connection;

    fn setup() -> (Connection, Cell<bool>) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        (conn, Cell::new(false))
    }

    fn table_exists(ex: &Executor<'_>, name: &str) -> bool {
        ex.query_optional(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name = ?",
            params![name],
            |row| Ok(row.get::<_, String>(0)?),
        )
        .unwrap()
        .is_some()
    }

    const V2_STEPS: &[&str] = &[
        "CREATE TABLE IF NOT EXISTS notes (_id TEXT PRIMARY KEY, body TEXT)",
    ];
    const V3_STEPS: &[&str] = &[
        "CREATE INDEX IF NOT EXISTS idx_notes_body ON notes(body)",
    ];
    const BROKEN_STEPS: &[&str] = &["CREATE TABLE broken ("];

    const TEST_MIGRATIONS: &[Migration] = &[
        Migration { version: 2, description: "notes table", statements: V2_STEPS },
        Migration { version: 3, description: "notes index", statements: V3_STEPS },
    ];

    #[test]
    fn test_current_version() {
        assert_eq!(SCHEMA_VERSION, 1);
        assert!(MIGRATIONS.iter().all(|m| m.version <= SCHEMA_VERSION));
    }

    #[test]
    fn test_fresh_schema_created() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        assert_eq!(get_schema_version(&ex).unwrap(), 0);

        assert_eq!(prepare_schema(&ex).unwrap(), SCHEMA_VERSION);
        assert_eq!(get_schema_version(&ex).unwrap(), SCHEMA_VERSION);

        for table in ["databaseConfigs", "subscriptions", "history", "favorites", "observables"] {
            assert!(table_exists(&ex, table), "missing table {}", table);
        }
        for index in [
            "idx_subscriptions_databaseId",
            "idx_history_databaseId",
            "idx_history_databaseId_date",
            "idx_favorites_databaseId",
            "idx_observables_databaseId",
        ] {
            assert!(table_exists(&ex, index), "missing index {}", index);
        }
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        prepare_schema(&ex).unwrap();
        prepare_schema(&ex).unwrap();
        assert_eq!(get_schema_version(&ex).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_chain_in_order() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        prepare_schema(&ex).unwrap();

        assert_eq!(prepare_schema_to(&ex, 3, TEST_MIGRATIONS).unwrap(), 3);
        assert_eq!(get_schema_version(&ex).unwrap(), 3);
        assert!(table_exists(&ex, "notes"));
        assert!(table_exists(&ex, "idx_notes_body"));
    }

    #[test]
    fn test_migration_skips_applied_steps() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        prepare_schema(&ex).unwrap();
        prepare_schema_to(&ex, 2, TEST_MIGRATIONS).unwrap();
        assert!(!table_exists(&ex, "idx_notes_body"));

        prepare_schema_to(&ex, 3, TEST_MIGRATIONS).unwrap();
        assert!(table_exists(&ex, "idx_notes_body"));
    }

    #[test]
    fn test_failed_chain_leaves_old_version() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        prepare_schema(&ex).unwrap();

        let steps = [
            Migration { version: 2, description: "notes table", statements: V2_STEPS },
            Migration { version: 3, description: "broken", statements: BROKEN_STEPS },
        ];

        match prepare_schema_to(&ex, 3, &steps) {
            Err(CacheError::MigrationFailed { from, to, .. }) => {
                assert_eq!(from, 1);
                assert_eq!(to, 3);
            }
            other => panic!("Expected MigrationFailed, got {:?}", other),
        }

        // Step 2 succeeded but was rolled back with the rest of the chain
        assert_eq!(get_schema_version(&ex).unwrap(), 1);
        assert!(!table_exists(&ex, "notes"));
        assert!(!ex.in_transaction());
    }

    #[test]
    fn test_unordered_steps_rejected() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        prepare_schema(&ex).unwrap();

        let steps = [TEST_MIGRATIONS[1], TEST_MIGRATIONS[0]];
        assert!(matches!(
            prepare_schema_to(&ex, 3, &steps),
            Err(CacheError::MigrationFailed { .. })
        ));
        assert_eq!(get_schema_version(&ex).unwrap(), 1);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        set_schema_version(&ex, 7).unwrap();

        match prepare_schema(&ex) {
            Err(CacheError::SchemaTooNew { found, supported }) => {
                assert_eq!(found, 7);
                assert_eq!(supported, SCHEMA_VERSION);
            }
            other => panic!("Expected SchemaTooNew, got {:?}", other),
        }
    }

    #[test]
    fn test_version_never_decreases() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        set_schema_version(&ex, 3).unwrap();
        assert!(matches!(
            set_schema_version(&ex, 2),
            Err(CacheError::InvalidOperation(_))
        ));
        assert_eq!(get_schema_version(&ex).unwrap(), 3);
    }
}
