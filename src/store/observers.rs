//! Observer registration operations

use crate::database::{ObserverMetadata, queries};
use crate::error::Result;
use super::cache_store::CacheStore;

impl CacheStore {
    pub fn insert_observer(&self, observer: &ObserverMetadata) -> Result<()> {
        self.with_executor(|ex| queries::insert_observer(ex, observer))
    }

    /// Replace the stored observer with the same id
    pub fn update_observer(&self, observer: &ObserverMetadata) -> Result<bool> {
        let changed = self.with_executor(|ex| queries::update_observer(ex, observer))?;
        Ok(changed > 0)
    }

    pub fn delete_observer(&self, id: &str) -> Result<bool> {
        let deleted = self.with_executor(|ex| queries::delete_observer(ex, id))?;
        Ok(deleted > 0)
    }

    pub fn delete_all_observers(&self, database_id: &str) -> Result<usize> {
        self.with_executor(|ex| queries::delete_all_observers(ex, database_id))
    }

    pub fn observers(&self, database_id: &str) -> Result<Vec<ObserverMetadata>> {
        self.with_executor(|ex| queries::get_observers(ex, database_id))
    }
}
