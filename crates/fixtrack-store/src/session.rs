//! SQLite sessions for the harness.
//!
//! A [`SqliteSource`] names a database file; every [`SessionSource::open`]
//! yields a fresh connection that closes when the session is dropped.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::dialect::SqliteDialect;
use crate::errors::{from_rusqlite, Result};
use fixtrack_core::dialect::Dialect;
use fixtrack_core::model::{TableSpec, Value};
use fixtrack_core::session::{QueryResult, SessionSource, StoreSession};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// One open SQLite connection.
pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection, e.g. to create schema in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl StoreSession for SqliteSession {
    fn execute(&mut self, sql: &str) -> Result<usize> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        if stmt.column_count() == 0 {
            return stmt.execute([]).map_err(from_rusqlite);
        }
        // Row-returning statements run to completion and count as no change
        let mut rows = stmt.query([]).map_err(from_rusqlite)?;
        while rows.next().map_err(from_rusqlite)?.is_some() {}
        Ok(0)
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(from_rusqlite)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(to_value(row.get_ref(i).map_err(from_rusqlite)?));
            }
            out.push(values);
        }

        Ok(QueryResult { columns, rows: out })
    }

    fn read_table(&mut self, table: &TableSpec) -> Result<QueryResult> {
        let sql = SqliteDialect.select_all_statement(table);
        self.query(&sql)
    }
}

/// SQLite storage classes map one-to-one onto harness values. Dates come
/// back as the text they were stored as.
fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Opens sessions against one database file.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
    dialect: SqliteDialect,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dialect: SqliteDialect,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSource for SqliteSource {
    type Session = SqliteSession;

    fn open(&self) -> Result<SqliteSession> {
        tracing::debug!(path = %self.path.display(), "opening sqlite session");
        db::open(&self.path).map(SqliteSession::new)
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }
}
