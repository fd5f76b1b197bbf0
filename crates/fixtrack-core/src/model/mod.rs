//! Value and table model shared by fixtures, snapshots and diffs.

pub mod table;
pub mod value;

pub use table::TableSpec;
pub use value::{PrimaryKey, Value};
