//! Statement execution and transactions
//!
//! Every statement is a `rusqlite::Statement` owned by the call that
//! prepared it, so it is finalized on every exit path. Parameters are
//! checked against a closed set of types before anything is prepared.

use std::cell::Cell;
use log::{debug, warn};
use rusqlite::types::{Null, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row, ToSql, params_from_iter};
use crate::error::{CacheError, Result};

/// A bindable value: text, 32-bit integer, real or null
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i32),
    Real(f64),
    Null,
}

impl SqlParam {
    /// Classify a `ToSql` value. Blobs and integers that do not fit in 32
    /// bits are rejected.
    pub fn classify(value: &dyn ToSql) -> Result<Self> {
        let output = value
            .to_sql()
            .map_err(|e| CacheError::UnsupportedParameterType(e.to_string()))?;

        let value_ref = match &output {
            ToSqlOutput::Borrowed(v) => *v,
            ToSqlOutput::Owned(v) => ValueRef::from(v),
            #[allow(unreachable_patterns)]
            _ => return Err(CacheError::UnsupportedParameterType("special output".to_string())),
        };

        match value_ref {
            ValueRef::Null => Ok(SqlParam::Null),
            ValueRef::Integer(i) => i32::try_from(i).map(SqlParam::Integer).map_err(|_| {
                CacheError::UnsupportedParameterType(format!("integer {} outside 32-bit range", i))
            }),
            ValueRef::Real(f) => Ok(SqlParam::Real(f)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| SqlParam::Text(s.to_string()))
                .map_err(|_| CacheError::UnsupportedParameterType("non UTF-8 text".to_string())),
            ValueRef::Blob(bytes) => Err(CacheError::UnsupportedParameterType(format!(
                "blob ({} bytes)",
                bytes.len()
            ))),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(s) => ToSqlOutput::from(s.as_str()),
            SqlParam::Integer(i) => ToSqlOutput::from(*i),
            SqlParam::Real(f) => ToSqlOutput::from(*f),
            SqlParam::Null => ToSqlOutput::from(Null),
        })
    }
}

/// Classify every parameter up front; nothing runs if any is rejected.
pub fn bind_params(params: &[&dyn ToSql]) -> Result<Vec<SqlParam>> {
    params.iter().map(|p| SqlParam::classify(*p)).collect()
}

/// Handle for running statements against the open session.
///
/// Borrowed from the session for the duration of one store call; never
/// stored.
pub struct Executor<'a> {
    conn: &'a Connection,
    in_transaction: &'a Cell<bool>,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(conn: &'a Connection, in_transaction: &'a Cell<bool>) -> Self {
        Self { conn, in_transaction }
    }

    /// Run a statement to completion, returning the number of changed rows
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        let values = bind_params(params)?;
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| CacheError::query_failed(sql, &e))?;
        stmt.execute(params_from_iter(values.iter()))
            .map_err(|e| CacheError::execute_failed(sql, &e))
    }

    /// Run a query, calling `handler` once per row. An error from the
    /// handler stops iteration and is returned.
    pub fn query<F>(&self, sql: &str, params: &[&dyn ToSql], mut handler: F) -> Result<()>
    where
        F: FnMut(&Row<'_>) -> Result<()>,
    {
        let values = bind_params(params)?;
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| CacheError::query_failed(sql, &e))?;
        let mut rows = stmt
            .query(params_from_iter(values.iter()))
            .map_err(|e| CacheError::query_failed(sql, &e))?;

        while let Some(row) = rows.next().map_err(|e| CacheError::query_failed(sql, &e))? {
            handler(row).map_err(|e| e.with_sql(sql))?;
        }
        Ok(())
    }

    /// Collect every row through `map`
    pub fn query_map<T, F>(&self, sql: &str, params: &[&dyn ToSql], mut map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> Result<T>,
    {
        let mut results = Vec::new();
        self.query(sql, params, |row| {
            results.push(map(row)?);
            Ok(())
        })?;
        Ok(results)
    }

    /// First row through `map`, `None` when the query returns nothing.
    /// Stops stepping after the first row.
    pub fn query_optional<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> Result<T>,
    {
        let values = bind_params(params)?;
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| CacheError::query_failed(sql, &e))?;
        let mut rows = stmt
            .query(params_from_iter(values.iter()))
            .map_err(|e| CacheError::query_failed(sql, &e))?;

        match rows.next().map_err(|e| CacheError::query_failed(sql, &e))? {
            Some(row) => map(row).map(Some).map_err(|e| e.with_sql(sql)),
            None => Ok(None),
        }
    }

    /// True while a transaction started through this session is open
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.get()
    }

    /// Run `block` atomically.
    ///
    /// Commits when `block` succeeds. On error the transaction is rolled
    /// back and the original error returned; a failing rollback is only
    /// logged. Nested calls fail with `NestedTransaction`.
    pub fn transaction<T, F>(&self, block: F) -> Result<T>
    where
        F: FnOnce(&Executor<'a>) -> Result<T>,
    {
        if self.in_transaction.get() {
            return Err(CacheError::NestedTransaction);
        }

        self.execute("BEGIN TRANSACTION", &[])?;
        debug!("Transaction started");
        let mut guard = TransactionGuard {
            executor: self,
            finished: false,
        };
        self.in_transaction.set(true);

        let value = block(self)?;

        self.execute("COMMIT", &[])?;
        guard.finished = true;
        debug!("Transaction committed");
        Ok(value)
    }

    pub(crate) fn rollback_quietly(&self) {
        if let Err(e) = self.execute("ROLLBACK", &[]) {
            warn!("Rollback failed: {}", e);
        } else {
            debug!("Transaction rolled back");
        }
    }
}

/// Clears the transaction flag and rolls back unless the commit went
/// through. Covers early returns and panics inside the block.
struct TransactionGuard<'e, 'a> {
    executor: &'e Executor<'a>,
    finished: bool,
}

impl Drop for TransactionGuard<'_, '_> {
    fn drop(&mut self) {
        self.executor.in_transaction.set(false);
        if !self.finished {
            self.executor.rollback_quietly();
        }
    }
}
