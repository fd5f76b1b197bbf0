//! Change computation engine.
//!
//! The core entry point is [`compute_changes`], which walks the rows of both
//! snapshots of each table in primary-key order and classifies every
//! difference.

use crate::diff::model::{ChangeKind, Changes, ColumnDelta, RowChange};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::Value;
use crate::snapshot::{RowState, Snapshot, TableState};
use crate::{log_op_end, log_op_error, log_op_start};
use fixtrack_core_types::schema::OP_CHANGES_COMPUTE;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Compute the changes from `start` to `end`.
///
/// Passing the same snapshot on both sides yields no changes.
///
/// # Errors
///
/// - `SnapshotMismatch` - the snapshots cover different tables, or a table's
///   column list differs between them
pub fn compute_changes(start: &Snapshot, end: &Snapshot) -> Result<Changes> {
    let started = Instant::now();
    log_op_start!(OP_CHANGES_COMPUTE, table_count = start.table_names().len());

    let result = diff_snapshots(start, end);
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(changes) => {
            log_op_end!(
                OP_CHANGES_COMPUTE,
                duration_ms = duration_ms,
                change_count = changes.change_count()
            );
        }
        Err(err) => {
            log_op_error!(OP_CHANGES_COMPUTE, err, duration_ms = duration_ms);
        }
    }
    result
}

fn diff_snapshots(start: &Snapshot, end: &Snapshot) -> Result<Changes> {
    check_same_tables(start, end)?;

    let mut tables = BTreeMap::new();
    for start_table in start.tables() {
        let name = start_table.name();
        let end_table = end.table(name).ok_or_else(|| mismatch(name, "missing at end"))?;
        let (start_key, end_key) = (&start_table.spec().primary_key, &end_table.spec().primary_key);
        if !same_columns(start_key, end_key) {
            return Err(mismatch(
                name,
                &format!("primary keys differ: start {:?}, end {:?}", start_key, end_key),
            ));
        }
        if !same_columns(start_table.columns(), end_table.columns()) {
            return Err(mismatch(
                name,
                &format!(
                    "columns differ: start {:?}, end {:?}",
                    start_table.columns(),
                    end_table.columns()
                ),
            ));
        }
        tables.insert(name.to_string(), diff_table(start_table, end_table));
    }

    Ok(Changes {
        start_taken_at: start.taken_at(),
        end_taken_at: end.taken_at(),
        tables,
    })
}

fn check_same_tables(start: &Snapshot, end: &Snapshot) -> Result<()> {
    let a: BTreeSet<&str> = start.table_names().into_iter().collect();
    let b: BTreeSet<&str> = end.table_names().into_iter().collect();
    if a == b {
        return Ok(());
    }
    let only_start: Vec<&str> = a.difference(&b).copied().collect();
    let only_end: Vec<&str> = b.difference(&a).copied().collect();
    Err(ExError::new(ExErrorKind::SnapshotMismatch)
        .with_op(OP_CHANGES_COMPUTE)
        .with_message(format!(
            "snapshots cover different tables: only at start {:?}, only at end {:?}",
            only_start, only_end
        )))
}

fn same_columns(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_ignore_ascii_case(y))
}

fn mismatch(table: &str, message: &str) -> ExError {
    ExError::new(ExErrorKind::SnapshotMismatch)
        .with_op(OP_CHANGES_COMPUTE)
        .with_table(table)
        .with_message(message.to_string())
}

/// Merge-walk both sides, which are already sorted by primary key.
fn diff_table(start: &TableState, end: &TableState) -> Vec<RowChange> {
    let columns = start.columns();
    let mut out = Vec::new();
    let mut a = start.rows().iter().peekable();
    let mut b = end.rows().iter().peekable();

    loop {
        let order = match (a.peek(), b.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(x), Some(y)) => x.primary_key.cmp(&y.primary_key),
        };
        match order {
            Ordering::Less => {
                if let Some(row) = a.next() {
                    out.push(one_sided(start.name(), columns, row, ChangeKind::Deletion));
                }
            }
            Ordering::Greater => {
                if let Some(row) = b.next() {
                    out.push(one_sided(start.name(), columns, row, ChangeKind::Creation));
                }
            }
            Ordering::Equal => {
                if let (Some(x), Some(y)) = (a.next(), b.next()) {
                    if x.values != y.values {
                        out.push(RowChange {
                            table: start.name().to_string(),
                            kind: ChangeKind::Modification,
                            primary_key: x.primary_key.clone(),
                            columns: columns
                                .iter()
                                .zip(x.values.iter().zip(&y.values))
                                .map(|(c, (s, e))| ColumnDelta::new(c.clone(), s.clone(), e.clone()))
                                .collect(),
                        });
                    }
                }
            }
        }
    }
    out
}

fn one_sided(table: &str, columns: &[String], row: &RowState, kind: ChangeKind) -> RowChange {
    let deltas = columns
        .iter()
        .zip(&row.values)
        .map(|(c, v)| match kind {
            ChangeKind::Deletion => ColumnDelta::new(c.clone(), v.clone(), Value::Null),
            _ => ColumnDelta::new(c.clone(), Value::Null, v.clone()),
        })
        .collect();
    RowChange {
        table: table.to_string(),
        kind,
        primary_key: row.primary_key.clone(),
        columns: deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableSpec;
    use crate::snapshot::SnapshotPoint;
    use chrono::Utc;

    fn snapshot(point: SnapshotPoint, rows: Vec<Vec<Value>>) -> Snapshot {
        let table = TableState::new(
            TableSpec::new("items", ["id"]),
            vec!["id".into(), "code".into()],
            rows,
        )
        .unwrap();
        Snapshot::new(point, Utc::now(), vec![table]).unwrap()
    }

    #[test]
    fn test_merge_walk_classifies_interleaved_keys() {
        let start = snapshot(
            SnapshotPoint::Start,
            vec![
                vec![Value::from(1), Value::from("a")],
                vec![Value::from(3), Value::from("c")],
                vec![Value::from(5), Value::from("e")],
            ],
        );
        let end = snapshot(
            SnapshotPoint::End,
            vec![
                vec![Value::from(2), Value::from("b")],
                vec![Value::from(3), Value::from("C")],
                vec![Value::from(5), Value::from("e")],
            ],
        );
        let changes = compute_changes(&start, &end).unwrap();
        let kinds: Vec<(String, ChangeKind)> = changes
            .changes_on_table("items")
            .iter()
            .map(|c| (c.primary_key.to_string(), c.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("(1)".to_string(), ChangeKind::Deletion),
                ("(2)".to_string(), ChangeKind::Creation),
                ("(3)".to_string(), ChangeKind::Modification),
            ]
        );
    }

    #[test]
    fn test_deletion_end_values_are_null() {
        let start = snapshot(SnapshotPoint::Start, vec![vec![Value::from(1), Value::from("a")]]);
        let end = snapshot(SnapshotPoint::End, vec![]);
        let changes = compute_changes(&start, &end).unwrap();
        let delta = changes.changes_on_table("items")[0].column_delta("code").unwrap();
        assert_eq!(delta.start, Value::from("a"));
        assert_eq!(delta.end, Value::Null);
        assert!(delta.touched);
    }
}
