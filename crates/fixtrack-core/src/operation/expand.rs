//! Expansion of an operation tree into concrete statements.

use crate::dialect::Dialect;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::generator::GeneratorCursor;
use crate::model::Value;
use crate::operation::{ColumnSpec, InsertSpec, Operation};

/// One concrete statement, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStatement {
    /// Zero-based position in the expanded sequence
    pub index: usize,
    /// Table the statement targets, when known
    pub table: Option<String>,
    pub sql: String,
}

/// Expand `op` into the statements an execution issues, without I/O.
///
/// Every insert row pulls exactly one value from each column's source. A
/// generator failure aborts the expansion, so no statement of a malformed
/// fixture ever reaches the store.
///
/// # Errors
///
/// - `Format` - a generator or literal cannot be rendered
pub fn expand_statements(op: &Operation, dialect: &dyn Dialect) -> Result<Vec<PlannedStatement>> {
    let mut out = Vec::new();
    for leaf in op.leaves() {
        match leaf {
            Operation::RawStatement { sql } => push(&mut out, None, sql.clone()),
            Operation::DeleteAll { table } => {
                push(&mut out, Some(table.as_str()), dialect.delete_all_statement(table))
            }
            Operation::Insert(spec) => expand_insert(spec, dialect, &mut out)?,
            Operation::Sequence { .. } => {}
        }
    }
    Ok(out)
}

enum ColumnSource<'a> {
    Cursor(GeneratorCursor<'a>),
    Fixed(&'a Value),
    Listed(std::slice::Iter<'a, Value>),
}

impl ColumnSource<'_> {
    fn next_value(&mut self) -> Result<Value> {
        match self {
            ColumnSource::Cursor(cursor) => cursor.next_value(),
            ColumnSource::Fixed(value) => Ok((*value).clone()),
            ColumnSource::Listed(values) => values.next().cloned().ok_or_else(|| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("expand_insert")
                    .with_message("explicit column list ran out of values")
            }),
        }
    }
}

fn expand_insert(
    spec: &InsertSpec,
    dialect: &dyn Dialect,
    out: &mut Vec<PlannedStatement>,
) -> Result<()> {
    let columns = spec.column_names();
    let mut sources: Vec<ColumnSource<'_>> = spec
        .columns()
        .iter()
        .map(|col| match &col.spec {
            ColumnSpec::Generated { generator } => ColumnSource::Cursor(generator.cursor()),
            ColumnSpec::Default { value } => ColumnSource::Fixed(value),
            ColumnSpec::Explicit { values } => ColumnSource::Listed(values.iter()),
        })
        .collect();

    for _ in 0..spec.row_count() {
        let row = sources
            .iter_mut()
            .map(|s| s.next_value())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.with_table(spec.table()))?;
        let sql = dialect.insert_statement(spec.table(), &columns, &row)?;
        push(out, Some(spec.table()), sql);
    }
    Ok(())
}

fn push(out: &mut Vec<PlannedStatement>, table: Option<&str>, sql: String) {
    out.push(PlannedStatement {
        index: out.len(),
        table: table.map(str::to_string),
        sql,
    });
}
