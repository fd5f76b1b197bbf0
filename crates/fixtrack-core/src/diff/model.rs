//! Change diff output types.
//!
//! Collections use `BTreeMap` and primary-key-sorted `Vec` for deterministic
//! iteration and serialization.

use crate::model::{PrimaryKey, Value};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Classification of a changed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the end snapshot
    Creation,
    /// Present in both with at least one differing column
    Modification,
    /// Present only in the start snapshot
    Deletion,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Creation => write!(f, "creation"),
            ChangeKind::Modification => write!(f, "modification"),
            ChangeKind::Deletion => write!(f, "deletion"),
        }
    }
}

/// Start and end value of one column of a changed row.
///
/// The missing side of a creation or deletion reads as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDelta {
    pub column: String,
    pub start: Value,
    pub end: Value,
    /// True when `start != end`
    pub touched: bool,
}

impl ColumnDelta {
    pub fn new(column: impl Into<String>, start: Value, end: Value) -> Self {
        let touched = start != end;
        Self {
            column: column.into(),
            start,
            end,
            touched,
        }
    }
}

/// One created, modified or deleted row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowChange {
    pub table: String,
    pub kind: ChangeKind,
    pub primary_key: PrimaryKey,
    /// One delta per column, in the table's column order
    pub columns: Vec<ColumnDelta>,
}

impl RowChange {
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    /// Delta for `column` (case-insensitive), if the table has it.
    pub fn column_delta(&self, column: &str) -> Option<&ColumnDelta> {
        self.columns
            .iter()
            .find(|d| d.column.eq_ignore_ascii_case(column))
    }

    /// Names of columns whose value differs between start and end.
    pub fn touched_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|d| d.touched)
            .map(|d| d.column.as_str())
            .collect()
    }
}

/// Every row change between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Changes {
    pub start_taken_at: DateTime<Utc>,
    pub end_taken_at: DateTime<Utc>,
    /// Keyed by table name; every compared table has an entry, possibly empty
    pub tables: BTreeMap<String, Vec<RowChange>>,
}

impl Changes {
    pub fn change_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Changes on one table in primary-key order; empty for an unchanged or
    /// unknown table.
    /// Changes on one table, matched case-insensitively like column names.
    /// An unchanged or unknown table yields an empty slice.
    pub fn changes_on_table(&self, table: &str) -> &[RowChange] {
        self.tables
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(table))
            .map_or(&[], |(_, rows)| rows.as_slice())
    }

    pub fn changes_of_kind(&self, kind: ChangeKind) -> Vec<&RowChange> {
        self.iter().filter(|c| c.kind == kind).collect()
    }

    /// All changes, tables by name then rows by primary key.
    pub fn iter(&self) -> impl Iterator<Item = &RowChange> {
        self.tables.values().flatten()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}
