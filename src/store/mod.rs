//! Store layer for the local cache
//!
//! This module provides the high-level `CacheStore` API for connection
//! profiles, subscriptions, query history, favorites and observers.

pub mod cache_store;
pub mod profiles;
pub mod subscriptions;
pub mod history;
pub mod favorites;
pub mod observers;

pub use cache_store::CacheStore;
