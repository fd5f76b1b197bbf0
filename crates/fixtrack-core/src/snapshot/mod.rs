//! Point-in-time captures of table contents.
//!
//! A [`Snapshot`] holds every row of a declared set of tables, keyed and
//! ordered by primary key, so two captures can be matched row by row.

pub mod capture;
pub mod model;

pub use capture::{capture, capture_with};
pub use model::{RowState, Snapshot, SnapshotPoint, TableState};
