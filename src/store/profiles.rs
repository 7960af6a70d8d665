//! Connection profile operations

use log::info;
use crate::database::{ConnectionProfile, queries};
use crate::error::Result;
use super::cache_store::CacheStore;

impl CacheStore {
    /// Add a profile. Fails with a constraint violation if another profile
    /// already uses the same `database_id`; nothing is written in that case.
    pub fn insert_profile(&self, profile: &ConnectionProfile) -> Result<()> {
        self.with_executor(|ex| queries::insert_profile(ex, profile))?;
        info!("Saved connection profile '{}'", profile.database_id);
        Ok(())
    }

    /// Replace the stored profile that has the same `database_id`.
    /// Returns false when there is no such profile.
    pub fn update_profile(&self, profile: &ConnectionProfile) -> Result<bool> {
        let changed = self.with_executor(|ex| queries::update_profile(ex, profile))?;
        Ok(changed > 0)
    }

    /// Remove a profile together with its subscriptions, history, favorites
    /// and observers. Returns false when there is no such profile.
    pub fn delete_profile(&self, database_id: &str) -> Result<bool> {
        let deleted = self.atomically(|ex| queries::delete_profile(ex, database_id))?;
        if deleted > 0 {
            info!("Deleted connection profile '{}'", database_id);
        }
        Ok(deleted > 0)
    }

    /// All profiles, by name
    pub fn profiles(&self) -> Result<Vec<ConnectionProfile>> {
        self.with_executor(queries::get_all_profiles)
    }

    /// Profile for `database_id`
    pub fn profile(&self, database_id: &str) -> Result<Option<ConnectionProfile>> {
        self.with_executor(|ex| queries::get_profile(ex, database_id))
    }
}
