//! Query history operations

use crate::database::{HistoryEntry, queries};
use crate::error::Result;
use crate::utils::now_timestamp;
use crate::DEFAULT_HISTORY_LIMIT;
use super::cache_store::CacheStore;

impl CacheStore {
    pub fn insert_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.with_executor(|ex| queries::insert_history(ex, entry))
    }

    /// Record that `query` was run.
    ///
    /// An identical query already in the history moves to the top instead
    /// of being stored twice. Returns the stored entry.
    pub fn record_history(&self, database_id: &str, query: &str) -> Result<HistoryEntry> {
        self.atomically(|ex| match queries::find_history_by_query(ex, database_id, query)? {
            Some(mut existing) => {
                existing.created_date = now_timestamp();
                queries::update_history_date(ex, &existing.id, &existing.created_date)?;
                Ok(existing)
            }
            None => {
                let entry = HistoryEntry::new(database_id, query);
                queries::insert_history(ex, &entry)?;
                Ok(entry)
            }
        })
    }

    pub fn delete_history(&self, id: &str) -> Result<bool> {
        let deleted = self.with_executor(|ex| queries::delete_history(ex, id))?;
        Ok(deleted > 0)
    }

    pub fn delete_all_history(&self, database_id: &str) -> Result<usize> {
        self.with_executor(|ex| queries::delete_all_history(ex, database_id))
    }

    /// Newest entries first, at most `limit`
    pub fn history(&self, database_id: &str, limit: u32) -> Result<Vec<HistoryEntry>> {
        self.with_executor(|ex| queries::get_history(ex, database_id, limit))
    }

    /// Newest entries first, up to [`DEFAULT_HISTORY_LIMIT`]
    pub fn recent_history(&self, database_id: &str) -> Result<Vec<HistoryEntry>> {
        self.history(database_id, DEFAULT_HISTORY_LIMIT)
    }
}
