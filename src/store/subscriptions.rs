//! Subscription operations

use crate::database::{Subscription, queries};
use crate::error::Result;
use super::cache_store::CacheStore;

impl CacheStore {
    pub fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.with_executor(|ex| queries::insert_subscription(ex, subscription))
    }

    /// Replace name, query and args of the subscription with the same id
    pub fn update_subscription(&self, subscription: &Subscription) -> Result<bool> {
        let changed = self.with_executor(|ex| queries::update_subscription(ex, subscription))?;
        Ok(changed > 0)
    }

    pub fn delete_subscription(&self, id: &str) -> Result<bool> {
        let deleted = self.with_executor(|ex| queries::delete_subscription(ex, id))?;
        Ok(deleted > 0)
    }

    /// Remove every subscription of a database, returning how many
    pub fn delete_all_subscriptions(&self, database_id: &str) -> Result<usize> {
        self.with_executor(|ex| queries::delete_all_subscriptions(ex, database_id))
    }

    /// Subscriptions of a database in insertion order
    pub fn subscriptions(&self, database_id: &str) -> Result<Vec<Subscription>> {
        self.with_executor(|ex| queries::get_subscriptions(ex, database_id))
    }
}
