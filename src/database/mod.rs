//! Database layer for the local cache
//!
//! Handles SQLite operations including:
//! - Opening and keying the encrypted file
//! - Schema creation and migrations
//! - Parameterized statements and transactions
//! - CRUD queries for the cache tables

pub mod models;
pub mod schema;
pub mod connection;
pub mod executor;
pub mod migrations;
pub mod queries;

pub use connection::Session;
pub use executor::{Executor, SqlParam};
pub use models::*;
