//! SQLite rendering of the core dialect.

use fixtrack_core::dialect::{common_literal, quote_double, Dialect};
use fixtrack_core::errors::Result;
use fixtrack_core::model::Value;

/// Dates are stored as ISO-8601 text; everything else follows the common
/// literal rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_double(ident)
    }

    fn literal(&self, value: &Value) -> Result<String> {
        common_literal(value)
    }
}
