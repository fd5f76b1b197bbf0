//! Caller-supplied table description.

use crate::errors::{ExError, ExErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The part of a table's schema the harness needs: its name and the columns
/// forming its primary key. All other columns are discovered from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub primary_key: Vec<String>,
}

impl TableSpec {
    pub fn new<I, S>(name: impl Into<String>, primary_key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            primary_key: primary_key.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate the spec.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` - empty name, no primary-key column, or a primary-key
    ///   column listed twice
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("table_spec_validate")
                .with_message("table name must not be empty"));
        }
        if self.primary_key.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("table_spec_validate")
                .with_table(&self.name)
                .with_message("table must declare at least one primary key column"));
        }
        let mut seen = BTreeSet::new();
        for col in &self.primary_key {
            if !seen.insert(col.to_ascii_lowercase()) {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("table_spec_validate")
                    .with_table(&self.name)
                    .with_message(format!("primary key column '{}' listed twice", col)));
            }
        }
        Ok(())
    }
}
