//! fixtrack core - deterministic fixtures and row-level change tracking
//!
//! This crate provides the store-agnostic part of the harness:
//! - Value generators producing closed-form column sequences
//! - Declarative, composable fixture operations and their executor
//! - A launch coordinator that skips re-seeding an already-applied fixture
//! - Table snapshots and a per-row, per-column diff engine
//! - A fluent assertion surface over the computed changes
//!
//! Drivers plug in through the [`session`] and [`dialect`] traits.

pub mod assertions;
pub mod dialect;
pub mod diff;
pub mod errors;
pub mod executor;
pub mod generator;
pub mod launch;
pub mod logging_facility;
pub mod model;
pub mod operation;
pub mod recorder;
pub mod session;
pub mod snapshot;

#[doc(hidden)]
pub use fixtrack_core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use assertions::assert_changes;
pub use diff::{compute_changes, ChangeKind, Changes, ColumnDelta, RowChange};
pub use errors::{AssertionFailure, ExError, ExErrorKind, Result};
pub use executor::{execute, execute_with, ExecutionReport};
pub use generator::{DateUnit, ValueGenerator};
pub use launch::{FixtureCoordinator, LaunchOutcome};
pub use model::{PrimaryKey, TableSpec, Value};
pub use operation::{compose, ColumnSpec, Operation};
pub use recorder::ChangeRecorder;
pub use session::{QueryResult, SessionSource, StoreSession};
pub use snapshot::{Snapshot, SnapshotPoint};
