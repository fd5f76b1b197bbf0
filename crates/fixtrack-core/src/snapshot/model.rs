//! Snapshot data types.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{PrimaryKey, TableSpec, Value};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which end of the observed interval a snapshot marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPoint {
    Start,
    End,
}

impl fmt::Display for SnapshotPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotPoint::Start => write!(f, "start"),
            SnapshotPoint::End => write!(f, "end"),
        }
    }
}

/// One captured row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowState {
    pub primary_key: PrimaryKey,
    /// Values in the table's column order
    pub values: Vec<Value>,
}

/// All rows of one table, sorted by primary key ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableState {
    spec: TableSpec,
    columns: Vec<String>,
    rows: Vec<RowState>,
}

impl TableState {
    /// Build a table state from raw rows in any order.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - invalid spec, a primary-key column missing from
    ///   `columns`, a row of the wrong width, or two rows sharing a key
    pub fn new(spec: TableSpec, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        spec.validate()?;
        let invalid = |message: String| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("table_state")
                .with_table(spec.name.clone())
                .with_message(message)
        };

        let mut key_indexes = Vec::with_capacity(spec.primary_key.len());
        for key in &spec.primary_key {
            let idx = columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(key))
                .ok_or_else(|| {
                    invalid(format!(
                        "primary key column '{}' not among columns {:?}",
                        key, columns
                    ))
                })?;
            key_indexes.push(idx);
        }

        let mut by_key = BTreeMap::new();
        for (i, values) in rows.into_iter().enumerate() {
            if values.len() != columns.len() {
                return Err(invalid(format!(
                    "row {} has {} values for {} columns",
                    i,
                    values.len(),
                    columns.len()
                )));
            }
            let primary_key =
                PrimaryKey::new(key_indexes.iter().map(|&k| values[k].clone()).collect());
            if by_key.contains_key(&primary_key) {
                return Err(invalid(format!("duplicate primary key {}", primary_key)));
            }
            by_key.insert(primary_key.clone(), RowState { primary_key, values });
        }

        Ok(Self {
            spec,
            columns,
            rows: by_key.into_values().collect(),
        })
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowState] {
        &self.rows
    }

    pub fn row(&self, key: &PrimaryKey) -> Option<&RowState> {
        self.rows
            .binary_search_by(|r| r.primary_key.cmp(key))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Values of one column, in primary-key order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))?;
        Some(self.rows.iter().map(|r| &r.values[idx]).collect())
    }
}

/// Immutable capture of a set of tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    point: SnapshotPoint,
    taken_at: DateTime<Utc>,
    tables: BTreeMap<String, TableState>,
}

impl Snapshot {
    /// # Errors
    ///
    /// - `InvalidInput` - two table states share a name
    pub fn new(
        point: SnapshotPoint,
        taken_at: DateTime<Utc>,
        tables: Vec<TableState>,
    ) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for table in tables {
            let name = table.name().to_string();
            if by_name.insert(name.clone(), table).is_some() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("snapshot")
                    .with_table(name)
                    .with_message("table captured twice in one snapshot"));
            }
        }
        Ok(Self {
            point,
            taken_at,
            tables: by_name,
        })
    }

    pub fn point(&self) -> SnapshotPoint {
        self.point
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn table(&self, name: &str) -> Option<&TableState> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableState> {
        self.tables.values()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn row_count(&self) -> usize {
        self.tables.values().map(|t| t.rows.len()).sum()
    }
}
