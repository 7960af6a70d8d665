//! SQL query operations for database access
//!
//! Low-level statements for the five cache tables. Every function takes an
//! `Executor`, so it runs the same inside or outside a transaction. For the
//! public API, use `CacheStore`.

use rusqlite::{Row, params};
use crate::error::{CacheError, Result};
use crate::utils::normalize_timestamp;
use super::executor::Executor;
use super::models::{
    AuthMode, ConnectionProfile, FavoriteEntry, HistoryEntry, ObserverMetadata, Subscription,
};

// ============================================================================
// Connection profile queries
// ============================================================================

const PROFILE_COLUMNS: &str = "_id, name, databaseId, mode, allowUntrustedCerts, \
     isBluetoothLeEnabled, isLanEnabled, isAwdlEnabled, isCloudSyncEnabled";

fn profile_from_row(row: &Row<'_>) -> Result<ConnectionProfile> {
    let mode: String = row.get(3)?;
    let mode = AuthMode::parse(&mode).ok_or_else(|| CacheError::QueryFailed {
        sql: String::new(),
        reason: format!("unknown auth mode '{}'", mode),
        code: None,
    })?;

    Ok(ConnectionProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        database_id: row.get(2)?,
        mode,
        allow_untrusted_certs: row.get(4)?,
        is_bluetooth_le_enabled: row.get(5)?,
        is_lan_enabled: row.get(6)?,
        is_awdl_enabled: row.get(7)?,
        is_cloud_sync_enabled: row.get(8)?,
    })
}

/// Insert a profile; fails with a constraint violation on a duplicate
/// `databaseId`
pub fn insert_profile(ex: &Executor<'_>, profile: &ConnectionProfile) -> Result<()> {
    ex.execute(
        "INSERT INTO databaseConfigs (_id, name, databaseId, mode, allowUntrustedCerts,
            isBluetoothLeEnabled, isLanEnabled, isAwdlEnabled, isCloudSyncEnabled)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            profile.id,
            profile.name,
            profile.database_id,
            profile.mode.as_str(),
            profile.allow_untrusted_certs,
            profile.is_bluetooth_le_enabled,
            profile.is_lan_enabled,
            profile.is_awdl_enabled,
            profile.is_cloud_sync_enabled,
        ],
    )?;
    Ok(())
}

/// Replace every mutable column of the profile with `databaseId`.
/// Returns the number of rows changed.
pub fn update_profile(ex: &Executor<'_>, profile: &ConnectionProfile) -> Result<usize> {
    ex.execute(
        "UPDATE databaseConfigs
         SET name = ?, mode = ?, allowUntrustedCerts = ?,
             isBluetoothLeEnabled = ?, isLanEnabled = ?, isAwdlEnabled = ?, isCloudSyncEnabled = ?
         WHERE databaseId = ?",
        params![
            profile.name,
            profile.mode.as_str(),
            profile.allow_untrusted_certs,
            profile.is_bluetooth_le_enabled,
            profile.is_lan_enabled,
            profile.is_awdl_enabled,
            profile.is_cloud_sync_enabled,
            profile.database_id,
        ],
    )
}

/// Delete a profile. Foreign keys cascade the delete to every child table.
pub fn delete_profile(ex: &Executor<'_>, database_id: &str) -> Result<usize> {
    ex.execute("DELETE FROM databaseConfigs WHERE databaseId = ?", params![database_id])
}

/// Get all profiles
pub fn get_all_profiles(ex: &Executor<'_>) -> Result<Vec<ConnectionProfile>> {
    ex.query_map(
        &format!("SELECT {} FROM databaseConfigs ORDER BY name", PROFILE_COLUMNS),
        params![],
        profile_from_row,
    )
}

/// Get the profile with `databaseId`
pub fn get_profile(ex: &Executor<'_>, database_id: &str) -> Result<Option<ConnectionProfile>> {
    ex.query_optional(
        &format!("SELECT {} FROM databaseConfigs WHERE databaseId = ?", PROFILE_COLUMNS),
        params![database_id],
        profile_from_row,
    )
}

// ============================================================================
// Subscription queries
// ============================================================================

fn subscription_from_row(row: &Row<'_>) -> Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        database_id: row.get(1)?,
        name: row.get(2)?,
        query: row.get(3)?,
        args: row.get(4)?,
    })
}

pub fn insert_subscription(ex: &Executor<'_>, subscription: &Subscription) -> Result<()> {
    ex.execute(
        "INSERT INTO subscriptions (_id, databaseId, name, query, args) VALUES (?, ?, ?, ?, ?)",
        params![
            subscription.id,
            subscription.database_id,
            subscription.name,
            subscription.query,
            subscription.args,
        ],
    )?;
    Ok(())
}

/// Replace name, query and args of the subscription with `_id`
pub fn update_subscription(ex: &Executor<'_>, subscription: &Subscription) -> Result<usize> {
    ex.execute(
        "UPDATE subscriptions SET name = ?, query = ?, args = ? WHERE _id = ?",
        params![subscription.name, subscription.query, subscription.args, subscription.id],
    )
}

pub fn delete_subscription(ex: &Executor<'_>, id: &str) -> Result<usize> {
    ex.execute("DELETE FROM subscriptions WHERE _id = ?", params![id])
}

pub fn delete_all_subscriptions(ex: &Executor<'_>, database_id: &str) -> Result<usize> {
    ex.execute("DELETE FROM subscriptions WHERE databaseId = ?", params![database_id])
}

pub fn get_subscriptions(ex: &Executor<'_>, database_id: &str) -> Result<Vec<Subscription>> {
    ex.query_map(
        "SELECT _id, databaseId, name, query, args FROM subscriptions WHERE databaseId = ? ORDER BY rowid",
        params![database_id],
        subscription_from_row,
    )
}

// ============================================================================
// History queries
// ============================================================================

fn history_from_row(row: &Row<'_>) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        database_id: row.get(1)?,
        query: row.get(2)?,
        created_date: row.get(3)?,
    })
}

/// Insert an entry; `createdDate` is stored in the normalized UTC form
pub fn insert_history(ex: &Executor<'_>, entry: &HistoryEntry) -> Result<()> {
    let created_date = normalize_timestamp(&entry.created_date)?;
    ex.execute(
        "INSERT INTO history (_id, databaseId, query, createdDate) VALUES (?, ?, ?, ?)",
        params![entry.id, entry.database_id, entry.query, created_date],
    )?;
    Ok(())
}

/// Newest entries first, at most `limit`
pub fn get_history(ex: &Executor<'_>, database_id: &str, limit: u32) -> Result<Vec<HistoryEntry>> {
    let limit = i32::try_from(limit).unwrap_or(i32::MAX);
    ex.query_map(
        "SELECT _id, databaseId, query, createdDate FROM history
         WHERE databaseId = ? ORDER BY julianday(createdDate) DESC, rowid DESC LIMIT ?",
        params![database_id, limit],
        history_from_row,
    )
}

/// Entry with exactly this query text, if any
pub fn find_history_by_query(ex: &Executor<'_>, database_id: &str, query: &str) -> Result<Option<HistoryEntry>> {
    ex.query_optional(
        "SELECT _id, databaseId, query, createdDate FROM history WHERE databaseId = ? AND query = ? LIMIT 1",
        params![database_id, query],
        history_from_row,
    )
}

/// Move an entry to the top of the history
pub fn update_history_date(ex: &Executor<'_>, id: &str, created_date: &str) -> Result<usize> {
    let created_date = normalize_timestamp(created_date)?;
    ex.execute("UPDATE history SET createdDate = ? WHERE _id = ?", params![created_date, id])
}

pub fn delete_history(ex: &Executor<'_>, id: &str) -> Result<usize> {
    ex.execute("DELETE FROM history WHERE _id = ?", params![id])
}

pub fn delete_all_history(ex: &Executor<'_>, database_id: &str) -> Result<usize> {
    ex.execute("DELETE FROM history WHERE databaseId = ?", params![database_id])
}

// ============================================================================
// Favorites queries
// ============================================================================

fn favorite_from_row(row: &Row<'_>) -> Result<FavoriteEntry> {
    Ok(FavoriteEntry {
        id: row.get(0)?,
        database_id: row.get(1)?,
        query: row.get(2)?,
        created_date: row.get(3)?,
    })
}

pub fn insert_favorite(ex: &Executor<'_>, favorite: &FavoriteEntry) -> Result<()> {
    let created_date = normalize_timestamp(&favorite.created_date)?;
    ex.execute(
        "INSERT INTO favorites (_id, databaseId, query, createdDate) VALUES (?, ?, ?, ?)",
        params![favorite.id, favorite.database_id, favorite.query, created_date],
    )?;
    Ok(())
}

/// Newest favorites first
pub fn get_favorites(ex: &Executor<'_>, database_id: &str) -> Result<Vec<FavoriteEntry>> {
    ex.query_map(
        "SELECT _id, databaseId, query, createdDate FROM favorites
         WHERE databaseId = ? ORDER BY julianday(createdDate) DESC, rowid DESC",
        params![database_id],
        favorite_from_row,
    )
}

pub fn find_favorite_by_query(ex: &Executor<'_>, database_id: &str, query: &str) -> Result<Option<FavoriteEntry>> {
    ex.query_optional(
        "SELECT _id, databaseId, query, createdDate FROM favorites WHERE databaseId = ? AND query = ? LIMIT 1",
        params![database_id, query],
        favorite_from_row,
    )
}

pub fn delete_favorite(ex: &Executor<'_>, id: &str) -> Result<usize> {
    ex.execute("DELETE FROM favorites WHERE _id = ?", params![id])
}

pub fn delete_favorite_by_query(ex: &Executor<'_>, database_id: &str, query: &str) -> Result<usize> {
    ex.execute(
        "DELETE FROM favorites WHERE databaseId = ? AND query = ?",
        params![database_id, query],
    )
}

pub fn delete_all_favorites(ex: &Executor<'_>, database_id: &str) -> Result<usize> {
    ex.execute("DELETE FROM favorites WHERE databaseId = ?", params![database_id])
}

// ============================================================================
// Observer queries
// ============================================================================

fn observer_from_row(row: &Row<'_>) -> Result<ObserverMetadata> {
    Ok(ObserverMetadata {
        id: row.get(0)?,
        database_id: row.get(1)?,
        name: row.get(2)?,
        query: row.get(3)?,
        args: row.get(4)?,
        is_active: row.get(5)?,
        last_updated: row.get(6)?,
    })
}

pub fn insert_observer(ex: &Executor<'_>, observer: &ObserverMetadata) -> Result<()> {
    let last_updated = observer.last_updated.as_deref().map(normalize_timestamp).transpose()?;
    ex.execute(
        "INSERT INTO observables (_id, databaseId, name, query, args, isActive, lastUpdated)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            observer.id,
            observer.database_id,
            observer.name,
            observer.query,
            observer.args,
            observer.is_active,
            last_updated,
        ],
    )?;
    Ok(())
}

/// Replace every mutable column of the observer with `_id`
pub fn update_observer(ex: &Executor<'_>, observer: &ObserverMetadata) -> Result<usize> {
    let last_updated = observer.last_updated.as_deref().map(normalize_timestamp).transpose()?;
    ex.execute(
        "UPDATE observables SET name = ?, query = ?, args = ?, isActive = ?, lastUpdated = ? WHERE _id = ?",
        params![
            observer.name,
            observer.query,
            observer.args,
            observer.is_active,
            last_updated,
            observer.id,
        ],
    )
}

pub fn delete_observer(ex: &Executor<'_>, id: &str) -> Result<usize> {
    ex.execute("DELETE FROM observables WHERE _id = ?", params![id])
}

pub fn delete_all_observers(ex: &Executor<'_>, database_id: &str) -> Result<usize> {
    ex.execute("DELETE FROM observables WHERE databaseId = ?", params![database_id])
}

pub fn get_observers(ex: &Executor<'_>, database_id: &str) -> Result<Vec<ObserverMetadata>> {
    ex.query_map(
        "SELECT _id, databaseId, name, query, args, isActive, lastUpdated
         FROM observables WHERE databaseId = ? ORDER BY rowid",
        params![database_id],
        observer_from_row,
    )
}

// ============================================================================
// Statistics
// ============================================================================

/// Tables that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTable {
    Profiles,
    Subscriptions,
    History,
    Favorites,
    Observers,
}

impl CacheTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            CacheTable::Profiles => "databaseConfigs",
            CacheTable::Subscriptions => "subscriptions",
            CacheTable::History => "history",
            CacheTable::Favorites => "favorites",
            CacheTable::Observers => "observables",
        }
    }
}

/// Row count of a table
pub fn count_rows(ex: &Executor<'_>, table: CacheTable) -> Result<u32> {
    let count = ex.query_optional(
        &format!("SELECT COUNT(*) FROM {}", table.table_name()),
        params![],
        |row| Ok(row.get::<_, u32>(0)?),
    )?;
    Ok(count.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use rusqlite::Connection;
    use crate::database::migrations::prepare_schema;

    fn setup() -> (Connection, Cell<bool>) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        let flag = Cell::new(false);
        prepare_schema(&Executor::new(&conn, &flag)).unwrap();
        (conn, flag)
    }

    fn history_at(database_id: &str, query: &str, date: &str) -> HistoryEntry {
        HistoryEntry {
            created_date: date.to_string(),
            ..HistoryEntry::new(database_id, query)
        }
    }

    #[test]
    fn test_profile_insert_and_read() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);

        let mut profile = ConnectionProfile::new("Prod", "db-1", AuthMode::SharedKey);
        profile.allow_untrusted_certs = true;
        profile.is_awdl_enabled = false;
        insert_profile(&ex, &profile).unwrap();

        assert_eq!(get_all_profiles(&ex).unwrap(), vec![profile.clone()]);
        assert_eq!(get_profile(&ex, "db-1").unwrap(), Some(profile));
        assert_eq!(get_profile(&ex, "db-2").unwrap(), None);
    }

    #[test]
    fn test_profile_duplicate_database_id() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);

        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();
        let err = insert_profile(&ex, &ConnectionProfile::new("B", "db-1", AuthMode::OnlinePlayground))
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count_rows(&ex, CacheTable::Profiles).unwrap(), 1);
    }

    #[test]
    fn test_profile_update_replaces_row() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        let mut profile = ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground);
        insert_profile(&ex, &profile).unwrap();

        profile.name = "Renamed".to_string();
        profile.mode = AuthMode::OfflinePlayground;
        profile.is_lan_enabled = false;
        assert_eq!(update_profile(&ex, &profile).unwrap(), 1);
        assert_eq!(get_profile(&ex, "db-1").unwrap(), Some(profile));
    }

    #[test]
    fn test_legacy_mode_is_read() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        ex.execute(
            "INSERT INTO databaseConfigs (_id, name, databaseId, mode) VALUES (?, ?, ?, ?)",
            params!["p1", "Legacy", "db-1", "online"],
        )
        .unwrap();

        let profile = get_profile(&ex, "db-1").unwrap().unwrap();
        assert_eq!(profile.mode, AuthMode::OnlinePlayground);
        // Column defaults
        assert!(!profile.allow_untrusted_certs);
        assert!(profile.is_cloud_sync_enabled);
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        ex.execute(
            "INSERT INTO databaseConfigs (_id, name, databaseId, mode) VALUES (?, ?, ?, ?)",
            params!["p1", "Odd", "db-1", "token"],
        )
        .unwrap();

        match get_all_profiles(&ex) {
            Err(CacheError::QueryFailed { sql, reason, .. }) => {
                assert!(sql.contains("databaseConfigs"));
                assert!(reason.contains("token"));
            }
            other => panic!("Expected QueryFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_child_requires_existing_profile() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);

        let err = insert_history(&ex, &HistoryEntry::new("nope", "SELECT 1")).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count_rows(&ex, CacheTable::History).unwrap(), 0);
    }

    #[test]
    fn test_delete_profile_cascades() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();
        insert_profile(&ex, &ConnectionProfile::new("B", "db-2", AuthMode::OnlinePlayground)).unwrap();

        for db in ["db-1", "db-2"] {
            insert_subscription(&ex, &Subscription::new(db, "s", "SELECT * FROM a")).unwrap();
            insert_history(&ex, &HistoryEntry::new(db, "SELECT * FROM a")).unwrap();
            insert_favorite(&ex, &FavoriteEntry::new(db, "SELECT * FROM a")).unwrap();
            insert_observer(&ex, &ObserverMetadata::new(db, "o", "SELECT * FROM a")).unwrap();
        }

        assert_eq!(delete_profile(&ex, "db-1").unwrap(), 1);

        assert!(get_subscriptions(&ex, "db-1").unwrap().is_empty());
        assert!(get_history(&ex, "db-1", 100).unwrap().is_empty());
        assert!(get_favorites(&ex, "db-1").unwrap().is_empty());
        assert!(get_observers(&ex, "db-1").unwrap().is_empty());

        assert_eq!(get_subscriptions(&ex, "db-2").unwrap().len(), 1);
        assert_eq!(get_history(&ex, "db-2", 100).unwrap().len(), 1);
        assert_eq!(get_favorites(&ex, "db-2").unwrap().len(), 1);
        assert_eq!(get_observers(&ex, "db-2").unwrap().len(), 1);
    }

    #[test]
    fn test_history_limit_newest_first() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();

        for (i, day) in ["01", "02", "03", "04", "05"].iter().enumerate() {
            let entry = history_at("db-1", &format!("q{}", i), &format!("2024-01-{}T00:00:00.000Z", day));
            insert_history(&ex, &entry).unwrap();
        }

        let recent = get_history(&ex, "db-1", 2).unwrap();
        let queries: Vec<&str> = recent.iter().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, vec!["q4", "q3"]);
    }

    #[test]
    fn test_history_mixed_precision_orders_by_time() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();

        insert_history(&ex, &history_at("db-1", "older", "2024-03-01T12:00:00Z")).unwrap();
        insert_history(&ex, &history_at("db-1", "newer", "2024-03-01T12:00:00.900Z")).unwrap();

        let recent = get_history(&ex, "db-1", 1).unwrap();
        assert_eq!(recent[0].query, "newer");

        let all = get_history(&ex, "db-1", 10).unwrap();
        assert_eq!(all[1].created_date, "2024-03-01T12:00:00.000Z");
    }

    #[test]
    fn test_legacy_second_precision_rows_order_by_time() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();

        // Written by an older client, bypassing normalization
        ex.execute(
            "INSERT INTO favorites (_id, databaseId, query, createdDate) VALUES (?, ?, ?, ?)",
            params!["f1", "db-1", "older", "2024-03-01T12:00:00Z"],
        )
        .unwrap();
        ex.execute(
            "INSERT INTO favorites (_id, databaseId, query, createdDate) VALUES (?, ?, ?, ?)",
            params!["f2", "db-1", "newer", "2024-03-01T12:00:00.900Z"],
        )
        .unwrap();

        let favorites = get_favorites(&ex, "db-1").unwrap();
        let queries: Vec<&str> = favorites.iter().map(|f| f.query.as_str()).collect();
        assert_eq!(queries, vec!["newer", "older"]);
    }

    #[test]
    fn test_invalid_created_date_rejected() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();

        let err = insert_history(&ex, &history_at("db-1", "SELECT 1", "last tuesday")).unwrap_err();
        assert!(matches!(err, CacheError::InvalidTimestamp(_)));

        let favorite = FavoriteEntry {
            created_date: String::new(),
            ..FavoriteEntry::new("db-1", "SELECT 1")
        };
        assert!(matches!(insert_favorite(&ex, &favorite), Err(CacheError::InvalidTimestamp(_))));
        assert_eq!(count_rows(&ex, CacheTable::History).unwrap(), 0);
        assert_eq!(count_rows(&ex, CacheTable::Favorites).unwrap(), 0);
    }

    #[test]
    fn test_history_find_and_touch() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();
        let old = history_at("db-1", "SELECT 1", "2024-01-01T00:00:00.000Z");
        insert_history(&ex, &old).unwrap();
        insert_history(&ex, &history_at("db-1", "SELECT 2", "2024-01-02T00:00:00.000Z")).unwrap();

        let found = find_history_by_query(&ex, "db-1", "SELECT 1").unwrap().unwrap();
        assert_eq!(found.id, old.id);
        assert!(find_history_by_query(&ex, "db-1", "SELECT 3").unwrap().is_none());

        update_history_date(&ex, &old.id, "2024-02-01T00:00:00.000Z").unwrap();
        assert_eq!(get_history(&ex, "db-1", 1).unwrap()[0].id, old.id);
    }

    #[test]
    fn test_favorites_by_query() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();
        insert_favorite(&ex, &FavoriteEntry::new("db-1", "SELECT 1")).unwrap();

        assert!(find_favorite_by_query(&ex, "db-1", "SELECT 1").unwrap().is_some());
        assert!(find_favorite_by_query(&ex, "db-2", "SELECT 1").unwrap().is_none());
        assert_eq!(delete_favorite_by_query(&ex, "db-1", "SELECT 1").unwrap(), 1);
        assert!(get_favorites(&ex, "db-1").unwrap().is_empty());
    }

    #[test]
    fn test_observer_update_and_delete() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();

        let mut observer = ObserverMetadata::new("db-1", "cars", "SELECT * FROM cars");
        insert_observer(&ex, &observer).unwrap();

        observer.is_active = false;
        observer.args = Some("{\"limit\":5}".to_string());
        observer.touch();
        assert_eq!(update_observer(&ex, &observer).unwrap(), 1);
        assert_eq!(get_observers(&ex, "db-1").unwrap(), vec![observer.clone()]);

        assert_eq!(delete_observer(&ex, &observer.id).unwrap(), 1);
        assert_eq!(delete_observer(&ex, &observer.id).unwrap(), 0);
    }

    #[test]
    fn test_delete_all_by_parent() {
        let (conn, flag) = setup();
        let ex = Executor::new(&conn, &flag);
        insert_profile(&ex, &ConnectionProfile::new("A", "db-1", AuthMode::OnlinePlayground)).unwrap();
        for name in ["a", "b", "c"] {
            insert_subscription(&ex, &Subscription::new("db-1", name, "SELECT 1")).unwrap();
        }

        assert_eq!(delete_all_subscriptions(&ex, "db-1").unwrap(), 3);
        assert_eq!(count_rows(&ex, CacheTable::Subscriptions).unwrap(), 0);
        assert_eq!(count_rows(&ex, CacheTable::Profiles).unwrap(), 1);
    }
}
