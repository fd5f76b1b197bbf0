//! Fluent assertions over computed changes.
//!
//! Every step returns `Result<_, AssertionFailure>` so tests can chain with
//! `?`. A failure carries the expected and actual values together with the
//! rendered summary of all changes.
//!
//! ```ignore
//! assert_changes(&changes)
//!     .has_change_count(1)?
//!     .on_table("items")
//!     .change_at(0)?
//!     .is_modification()?
//!     .column("price")?
//!     .has_values(100.0, 120.0)?;
//! ```

use crate::diff::{render_changes_summary, ChangeKind, Changes, ColumnDelta, RowChange};
use crate::errors::AssertionFailure;
use crate::model::{PrimaryKey, Value};

type AssertResult<T> = std::result::Result<T, AssertionFailure>;

/// Entry point of the fluent surface.
pub fn assert_changes(changes: &Changes) -> ChangesAssert<'_> {
    ChangesAssert { changes }
}

#[derive(Debug, Clone, Copy)]
pub struct ChangesAssert<'a> {
    changes: &'a Changes,
}

impl<'a> ChangesAssert<'a> {
    pub fn has_change_count(self, expected: usize) -> AssertResult<Self> {
        let actual = self.changes.change_count();
        if actual != expected {
            return Err(AssertionFailure::ChangeCount {
                expected,
                actual,
                context: render_changes_summary(self.changes),
            });
        }
        Ok(self)
    }

    pub fn has_no_changes(self) -> AssertResult<Self> {
        self.has_change_count(0)
    }

    /// Narrow to one table. An unchanged table yields an empty selection.
    pub fn on_table(self, table: &str) -> TableChangesAssert<'a> {
        TableChangesAssert {
            changes: self.changes,
            table: table.to_string(),
            rows: self.changes.changes_on_table(table),
        }
    }

    pub fn changes(&self) -> &'a Changes {
        self.changes
    }
}

#[derive(Debug, Clone)]
pub struct TableChangesAssert<'a> {
    changes: &'a Changes,
    table: String,
    rows: &'a [RowChange],
}

impl<'a> TableChangesAssert<'a> {
    pub fn has_change_count(self, expected: usize) -> AssertResult<Self> {
        if self.rows.len() != expected {
            return Err(AssertionFailure::ChangeCount {
                expected,
                actual: self.rows.len(),
                context: render_changes_summary(self.changes),
            });
        }
        Ok(self)
    }

    /// Select the `index`-th change of the table in primary-key order.
    pub fn change_at(&self, index: usize) -> AssertResult<RowChangeAssert<'a>> {
        self.rows
            .get(index)
            .map(|change| RowChangeAssert {
                changes: self.changes,
                change,
            })
            .ok_or_else(|| AssertionFailure::ChangeIndexOutOfRange {
                table: self.table.clone(),
                index,
                available: self.rows.len(),
                context: render_changes_summary(self.changes),
            })
    }

    /// Select the change whose row has primary key `key`.
    pub fn change_with_pk(&self, key: impl Into<PrimaryKey>) -> AssertResult<RowChangeAssert<'a>> {
        let key = key.into();
        self.rows
            .iter()
            .find(|c| c.primary_key == key)
            .map(|change| RowChangeAssert {
                changes: self.changes,
                change,
            })
            .ok_or_else(|| AssertionFailure::NoChangeForPrimaryKey {
                table: self.table.clone(),
                primary_key: key.to_string(),
                context: render_changes_summary(self.changes),
            })
    }

    pub fn rows(&self) -> &'a [RowChange] {
        self.rows
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RowChangeAssert<'a> {
    changes: &'a Changes,
    change: &'a RowChange,
}

impl<'a> RowChangeAssert<'a> {
    pub fn is_of_kind(self, expected: ChangeKind) -> AssertResult<Self> {
        if self.change.kind != expected {
            return Err(AssertionFailure::ChangeKind {
                table: self.change.table.clone(),
                primary_key: self.change.primary_key.to_string(),
                expected: expected.to_string(),
                actual: self.change.kind.to_string(),
                context: render_changes_summary(self.changes),
            });
        }
        Ok(self)
    }

    pub fn is_creation(self) -> AssertResult<Self> {
        self.is_of_kind(ChangeKind::Creation)
    }

    pub fn is_modification(self) -> AssertResult<Self> {
        self.is_of_kind(ChangeKind::Modification)
    }

    pub fn is_deletion(self) -> AssertResult<Self> {
        self.is_of_kind(ChangeKind::Deletion)
    }

    /// The touched columns are exactly `expected`, in any order.
    pub fn has_touched_columns(self, expected: &[&str]) -> AssertResult<Self> {
        let mut actual: Vec<String> = self
            .change
            .touched_columns()
            .into_iter()
            .map(str::to_ascii_lowercase)
            .collect();
        let mut wanted: Vec<String> = expected.iter().map(|c| c.to_ascii_lowercase()).collect();
        actual.sort();
        wanted.sort();
        if actual != wanted {
            return Err(AssertionFailure::TouchedColumns {
                table: self.change.table.clone(),
                primary_key: self.change.primary_key.to_string(),
                expected: wanted,
                actual,
                context: render_changes_summary(self.changes),
            });
        }
        Ok(self)
    }

    pub fn column(self, column: &str) -> AssertResult<ColumnDeltaAssert<'a>> {
        self.change
            .column_delta(column)
            .map(|delta| ColumnDeltaAssert { row: self, delta })
            .ok_or_else(|| AssertionFailure::UnknownColumn {
                table: self.change.table.clone(),
                primary_key: self.change.primary_key.to_string(),
                column: column.to_string(),
                context: render_changes_summary(self.changes),
            })
    }

    pub fn change(&self) -> &'a RowChange {
        self.change
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDeltaAssert<'a> {
    row: RowChangeAssert<'a>,
    delta: &'a ColumnDelta,
}

impl<'a> ColumnDeltaAssert<'a> {
    fn fail(&self, expected: String, actual: String) -> AssertionFailure {
        AssertionFailure::ColumnDelta {
            table: self.row.change.table.clone(),
            primary_key: self.row.change.primary_key.to_string(),
            column: self.delta.column.clone(),
            expected,
            actual,
            context: render_changes_summary(self.row.changes),
        }
    }

    pub fn is_touched(self) -> AssertResult<Self> {
        if !self.delta.touched {
            return Err(self.fail("touched".into(), format!("untouched ({})", self.delta.start)));
        }
        Ok(self)
    }

    pub fn is_untouched(self) -> AssertResult<Self> {
        if self.delta.touched {
            return Err(self.fail(
                "untouched".into(),
                format!("{} -> {}", self.delta.start, self.delta.end),
            ));
        }
        Ok(self)
    }

    pub fn has_values(self, start: impl Into<Value>, end: impl Into<Value>) -> AssertResult<Self> {
        let (start, end) = (start.into(), end.into());
        if self.delta.start != start || self.delta.end != end {
            return Err(self.fail(
                format!("{} -> {}", start, end),
                format!("{} -> {}", self.delta.start, self.delta.end),
            ));
        }
        Ok(self)
    }

    pub fn has_start_value(self, start: impl Into<Value>) -> AssertResult<Self> {
        let start = start.into();
        if self.delta.start != start {
            return Err(self.fail(format!("start {}", start), format!("start {}", self.delta.start)));
        }
        Ok(self)
    }

    pub fn has_end_value(self, end: impl Into<Value>) -> AssertResult<Self> {
        let end = end.into();
        if self.delta.end != end {
            return Err(self.fail(format!("end {}", end), format!("end {}", self.delta.end)));
        }
        Ok(self)
    }

    /// Return to the row to assert on another column.
    pub fn and(self) -> RowChangeAssert<'a> {
        self.row
    }

    pub fn delta(&self) -> &'a ColumnDelta {
        self.delta
    }
}
