//! Start/end change recording around a block of test logic.

use crate::diff::{compute_changes, Changes};
use crate::errors::Result;
use crate::model::TableSpec;
use crate::session::SessionSource;
use crate::snapshot::{capture_with, Snapshot, SnapshotPoint};

/// Holds a start snapshot of a fixed table set until the end point is taken.
///
/// The same table list is used at both points, so the two captures always
/// cover identical tables.
pub struct ChangeRecorder<'s, S: SessionSource> {
    source: &'s S,
    tables: Vec<TableSpec>,
    start: Snapshot,
}

impl<'s, S: SessionSource> ChangeRecorder<'s, S> {
    /// Take the start snapshot now.
    ///
    /// # Errors
    ///
    /// - see [`crate::snapshot::capture`]
    pub fn start(source: &'s S, tables: Vec<TableSpec>) -> Result<Self> {
        let start = capture_with(SnapshotPoint::Start, source, &tables)?;
        Ok(Self {
            source,
            tables,
            start,
        })
    }

    pub fn start_snapshot(&self) -> &Snapshot {
        &self.start
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// Changes from the start point to now, keeping the recorder usable.
    ///
    /// # Errors
    ///
    /// - see [`crate::snapshot::capture`] and [`compute_changes`]
    pub fn changes_so_far(&self) -> Result<Changes> {
        let end = capture_with(SnapshotPoint::End, self.source, &self.tables)?;
        compute_changes(&self.start, &end)
    }

    /// Take the end snapshot now and compute the changes.
    ///
    /// # Errors
    ///
    /// - see [`Self::changes_so_far`]
    pub fn finish(self) -> Result<Changes> {
        self.changes_so_far()
    }
}
