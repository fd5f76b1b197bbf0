//! Declarative fixture operations.
//!
//! An [`Operation`] is an immutable tree describing fixture work. It is built
//! with ordinary constructor functions, can be executed any number of times,
//! and always expands to the same literal statements.
//!
//! ```
//! use fixtrack_core::generator::ValueGenerator;
//! use fixtrack_core::operation::{compose, ColumnSpec, Operation};
//!
//! let fixture = compose([
//!     Operation::delete_all("items"),
//!     Operation::insert(
//!         "items",
//!         3,
//!         [
//!             ("id", ColumnSpec::generated(ValueGenerator::constant_sequence(1, 1))),
//!             ("code", ColumnSpec::generated(ValueGenerator::padded_string_sequence("A", 1, 1, 4))),
//!             ("name", ColumnSpec::default_value("widget")),
//!         ],
//!     )
//!     .unwrap(),
//! ]);
//! assert_eq!(fixture.leaves().len(), 2);
//! ```

pub mod expand;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::generator::ValueGenerator;
use crate::model::Value;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use std::collections::BTreeSet;

pub use expand::{expand_statements, PlannedStatement};

/// Where the values of one inserted column come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ColumnSpec {
    /// Pulled from a fresh cursor of the generator
    Generated { generator: ValueGenerator },
    /// The same value for every row
    Default { value: Value },
    /// One literal per row; the list length must equal the row count
    Explicit { values: Vec<Value> },
}

impl ColumnSpec {
    pub fn generated(generator: ValueGenerator) -> Self {
        ColumnSpec::Generated { generator }
    }

    pub fn default_value(value: impl Into<Value>) -> Self {
        ColumnSpec::Default {
            value: value.into(),
        }
    }

    pub fn explicit<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ColumnSpec::Explicit {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named column of an insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub spec: ColumnSpec,
}

/// Validated insert of `row_count` rows into one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertSpec {
    table: String,
    row_count: usize,
    columns: Vec<ColumnDef>,
}

impl InsertSpec {
    /// # Errors
    ///
    /// - `InvalidInput` - empty table name, no columns, a duplicate column,
    ///   or an explicit list whose length differs from `row_count`
    pub fn new(table: impl Into<String>, row_count: usize, columns: Vec<ColumnDef>) -> Result<Self> {
        let table = table.into();
        let invalid = |message: String| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("operation_insert")
                .with_table(table.clone())
                .with_message(message)
        };

        if table.trim().is_empty() {
            return Err(invalid("table name must not be empty".to_string()));
        }
        if columns.is_empty() {
            return Err(invalid("insert must declare at least one column".to_string()));
        }
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.to_ascii_lowercase()) {
                return Err(invalid(format!("column '{}' declared twice", col.name)));
            }
            if let ColumnSpec::Explicit { values } = &col.spec {
                if values.len() != row_count {
                    return Err(invalid(format!(
                        "column '{}' lists {} values for {} rows",
                        col.name,
                        values.len(),
                        row_count
                    )));
                }
            }
        }

        Ok(Self {
            table,
            row_count,
            columns,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// A unit of fixture work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Issued verbatim
    RawStatement { sql: String },
    /// Expanded to one insert per row
    Insert(InsertSpec),
    /// The dialect's delete-all statement for one table
    DeleteAll { table: String },
    /// Sub-operations in declaration order
    Sequence { operations: Vec<Operation> },
}

impl Operation {
    pub fn raw(sql: impl Into<String>) -> Self {
        Operation::RawStatement { sql: sql.into() }
    }

    pub fn delete_all(table: impl Into<String>) -> Self {
        Operation::DeleteAll {
            table: table.into(),
        }
    }

    /// Delete-all for several tables, in the order given.
    pub fn delete_all_from<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        compose(tables.into_iter().map(Operation::delete_all))
    }

    /// Insert `row_count` rows, one value per row from each column spec.
    ///
    /// # Errors
    ///
    /// See [`InsertSpec::new`].
    pub fn insert<I, S>(table: impl Into<String>, row_count: usize, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ColumnSpec)>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, spec)| ColumnDef {
                name: name.into(),
                spec,
            })
            .collect();
        Ok(Operation::Insert(InsertSpec::new(table, row_count, columns)?))
    }

    /// Insert literal rows given row-wise.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - a row's width differs from the column count, or see
    ///   [`InsertSpec::new`]
    pub fn insert_rows<C, S>(table: impl Into<String>, columns: C, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let names: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut per_column: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("operation_insert")
                    .with_table(table)
                    .with_message(format!(
                        "row {} has {} values for {} columns",
                        i,
                        row.len(),
                        names.len()
                    )));
            }
            for (col, value) in per_column.iter_mut().zip(row.iter()) {
                col.push(value.clone());
            }
        }
        let row_count = rows.len();
        let columns = names
            .into_iter()
            .zip(per_column)
            .map(|(name, values)| ColumnDef {
                name,
                spec: ColumnSpec::Explicit { values },
            })
            .collect();
        Ok(Operation::Insert(InsertSpec::new(table, row_count, columns)?))
    }

    /// Leaf operations in execution order.
    pub fn leaves(&self) -> Vec<&Operation> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// SHA-256 over the canonical JSON encoding of the tree.
    ///
    /// Two operations built independently with the same content share a
    /// digest.
    ///
    /// # Errors
    ///
    /// - `Serialization` - the tree could not be encoded
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_string(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("operation_digest")
                .with_message(e.to_string())
        })?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

fn collect_leaves<'a>(op: &'a Operation, out: &mut Vec<&'a Operation>) {
    match op {
        Operation::Sequence { operations } => {
            for child in operations {
                collect_leaves(child, out);
            }
        }
        leaf => out.push(leaf),
    }
}

/// Compose operations into one sequence, flattening nested sequences and
/// preserving declaration order.
pub fn compose<I>(operations: I) -> Operation
where
    I: IntoIterator<Item = Operation>,
{
    let mut flat = Vec::new();
    for op in operations {
        match op {
            Operation::Sequence { operations } => {
                if let Operation::Sequence { operations: inner } = compose(operations) {
                    flat.extend(inner);
                }
            }
            leaf => flat.push(leaf),
        }
    }
    Operation::Sequence { operations: flat }
}
