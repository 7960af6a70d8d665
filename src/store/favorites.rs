//! Favorite query operations

use crate::database::{FavoriteEntry, queries};
use crate::error::Result;
use super::cache_store::CacheStore;

impl CacheStore {
    pub fn insert_favorite(&self, favorite: &FavoriteEntry) -> Result<()> {
        self.with_executor(|ex| queries::insert_favorite(ex, favorite))
    }

    /// Star `query`; returns the existing entry if it is already a favorite
    pub fn add_favorite(&self, database_id: &str, query: &str) -> Result<FavoriteEntry> {
        self.atomically(|ex| {
            if let Some(existing) = queries::find_favorite_by_query(ex, database_id, query)? {
                return Ok(existing);
            }
            let favorite = FavoriteEntry::new(database_id, query);
            queries::insert_favorite(ex, &favorite)?;
            Ok(favorite)
        })
    }

    pub fn is_favorited(&self, database_id: &str, query: &str) -> Result<bool> {
        let found = self.with_executor(|ex| queries::find_favorite_by_query(ex, database_id, query))?;
        Ok(found.is_some())
    }

    pub fn delete_favorite(&self, id: &str) -> Result<bool> {
        let deleted = self.with_executor(|ex| queries::delete_favorite(ex, id))?;
        Ok(deleted > 0)
    }

    /// Unstar `query`
    pub fn delete_favorite_by_query(&self, database_id: &str, query: &str) -> Result<bool> {
        let deleted = self.with_executor(|ex| queries::delete_favorite_by_query(ex, database_id, query))?;
        Ok(deleted > 0)
    }

    pub fn delete_all_favorites(&self, database_id: &str) -> Result<usize> {
        self.with_executor(|ex| queries::delete_all_favorites(ex, database_id))
    }

    /// Favorites of a database, newest first
    pub fn favorites(&self, database_id: &str) -> Result<Vec<FavoriteEntry>> {
        self.with_executor(|ex| queries::get_favorites(ex, database_id))
    }
}
