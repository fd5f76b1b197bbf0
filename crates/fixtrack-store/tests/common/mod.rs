//! Scratch SQLite databases with the item and user tables used across the
//! store tests.

use fixtrack_core::model::TableSpec;
use fixtrack_store::SqliteSource;
use tempfile::TempDir;

pub const SCHEMA: &str = "
CREATE TABLE items (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT,
    price REAL,
    purchase_date TEXT
);
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    login TEXT NOT NULL
);
";

/// Keeps the directory alive for as long as the database is used.
pub struct TestDb {
    _dir: TempDir,
    pub source: SqliteSource,
}

pub fn setup_test_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtures.sqlite");
    let conn = fixtrack_store::db::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    drop(conn);
    TestDb {
        _dir: dir,
        source: SqliteSource::new(path),
    }
}

#[allow(dead_code)]
pub fn tracked_tables() -> Vec<TableSpec> {
    vec![
        TableSpec::new("items", ["id"]),
        TableSpec::new("users", ["id"]),
    ]
}

#[allow(dead_code)]
pub fn count_rows(db: &TestDb, table: &str) -> i64 {
    let conn = fixtrack_store::db::open(db.source.path()).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}
