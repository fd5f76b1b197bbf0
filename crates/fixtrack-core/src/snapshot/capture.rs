//! Reading table contents from the store into a [`Snapshot`].

use crate::errors::Result;
use crate::model::TableSpec;
use crate::session::{SessionSource, StoreSession};
use crate::snapshot::model::{Snapshot, SnapshotPoint, TableState};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::Utc;
use fixtrack_core_types::schema::OP_SNAPSHOT_CAPTURE;
use std::time::Instant;

/// Capture `tables` through an open session.
///
/// # Errors
///
/// - `InvalidInput` - a table spec is invalid, listed twice, or its key
///   columns are absent from the store's result
/// - `Persistence` - a table read failed
pub fn capture(
    point: SnapshotPoint,
    session: &mut dyn StoreSession,
    tables: &[TableSpec],
) -> Result<Snapshot> {
    let started = Instant::now();
    log_op_start!(OP_SNAPSHOT_CAPTURE, point = %point, table_count = tables.len());

    let result = read_all(point, session, tables);
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(snapshot) => {
            log_op_end!(
                OP_SNAPSHOT_CAPTURE,
                duration_ms = duration_ms,
                point = %point,
                row_count = snapshot.row_count()
            );
        }
        Err(err) => {
            log_op_error!(OP_SNAPSHOT_CAPTURE, err, duration_ms = duration_ms, point = %point);
        }
    }
    result
}

fn read_all(
    point: SnapshotPoint,
    session: &mut dyn StoreSession,
    tables: &[TableSpec],
) -> Result<Snapshot> {
    let taken_at = Utc::now();
    let mut states = Vec::with_capacity(tables.len());
    for spec in tables {
        spec.validate()?;
        let result = session.read_table(spec)?;
        tracing::debug!(table = %spec.name, row_count = result.rows.len(), "table read");
        states.push(TableState::new(spec.clone(), result.columns, result.rows)?);
    }
    Snapshot::new(point, taken_at, states)
}

/// Capture `tables` on a session opened from `source` for the duration of
/// the call.
///
/// # Errors
///
/// - `Persistence` - the session could not be opened
/// - see [`capture`]
pub fn capture_with<S: SessionSource>(
    point: SnapshotPoint,
    source: &S,
    tables: &[TableSpec],
) -> Result<Snapshot> {
    let mut session = source.open()?;
    capture(point, &mut session, tables)
}
