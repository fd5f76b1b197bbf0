//! Change diff engine.
//!
//! Compares two snapshots of the same tables and reports, per table, which
//! rows were created, modified or deleted and how each column moved.
//!
//! ## Entry point
//!
//! ```ignore
//! use fixtrack_core::diff::compute_changes;
//!
//! let changes = compute_changes(&start, &end)?;
//! println!("{}", fixtrack_core::diff::render_changes_summary(&changes));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: tables are reported by name, rows by primary key ascending.
//! - **Exact accounting**: `change_count()` equals the number of reported rows;
//!   unchanged rows are never reported.
//! - **Key reuse**: a row deleted and re-inserted with the same primary key
//!   between the two captures is reported as a modification.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::compute_changes;
pub use human_summary::{render_changes_summary, render_row_change};
pub use model::{ChangeKind, Changes, ColumnDelta, RowChange};
