//! SQL rendering seam.
//!
//! The harness builds every statement it issues through a [`Dialect`], so
//! identifier quoting and literal formats stay a concern of the caller's
//! store binding. [`AnsiDialect`] is the standard-SQL rendering.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{TableSpec, Value};

/// Renders identifiers, literals and the statements the harness needs.
pub trait Dialect {
    /// Quote a table or column identifier.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Render a value as a SQL literal.
    ///
    /// # Errors
    ///
    /// - `Format` - the value has no literal form in this dialect
    fn literal(&self, value: &Value) -> Result<String>;

    /// Single-row insert.
    ///
    /// # Errors
    ///
    /// - `Format` - a value has no literal form
    /// - `InvalidInput` - column and value counts differ
    fn insert_statement(&self, table: &str, columns: &[String], values: &[Value]) -> Result<String> {
        if columns.len() != values.len() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("insert_statement")
                .with_table(table)
                .with_message(format!(
                    "{} columns but {} values",
                    columns.len(),
                    values.len()
                )));
        }
        let cols: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        let vals = values
            .iter()
            .map(|v| self.literal(v))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote_identifier(table),
            cols.join(", "),
            vals.join(", ")
        ))
    }

    /// Remove every row of a table.
    fn delete_all_statement(&self, table: &str) -> String {
        format!("DELETE FROM {}", self.quote_identifier(table))
    }

    /// Full read of a table ordered by primary key ascending.
    fn select_all_statement(&self, table: &TableSpec) -> String {
        let order: Vec<String> = table
            .primary_key
            .iter()
            .map(|c| format!("{} ASC", self.quote_identifier(c)))
            .collect();
        format!(
            "SELECT * FROM {} ORDER BY {}",
            self.quote_identifier(&table.name),
            order.join(", ")
        )
    }
}

/// Standard SQL: double-quoted identifiers and `DATE 'YYYY-MM-DD'` literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn quote_identifier(&self, ident: &str) -> String {
        quote_double(ident)
    }

    fn literal(&self, value: &Value) -> Result<String> {
        match value {
            Value::Date(d) => Ok(format!("DATE '{}'", d.format("%Y-%m-%d"))),
            other => common_literal(other),
        }
    }
}

/// `"ident"` with embedded quotes doubled.
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Literal rendering shared by dialects that only differ on dates.
///
/// # Errors
///
/// - `Format` - a non-finite real
pub fn common_literal(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(r) if r.is_finite() => Ok(format!("{:?}", r)),
        Value::Real(r) => Err(ExError::new(ExErrorKind::Format)
            .with_op("render_literal")
            .with_message(format!("non-finite real {} has no SQL literal", r))),
        Value::Text(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
        Value::Date(d) => Ok(format!("'{}'", d.format("%Y-%m-%d"))),
        Value::Blob(b) => Ok(format!("X'{}'", hex::encode_upper(b))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_insert_statement_quotes_and_escapes() {
        let sql = AnsiDialect
            .insert_statement(
                "items",
                &["code".to_string(), "name".to_string()],
                &[Value::from("A0001"), Value::from("O'Brien")],
            )
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"items\" (\"code\", \"name\") VALUES ('A0001', 'O''Brien')"
        );
    }

    #[test]
    fn test_date_literal() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(AnsiDialect.literal(&Value::Date(d)).unwrap(), "DATE '2024-04-01'");
    }

    #[test]
    fn test_real_literal_keeps_decimal_point() {
        assert_eq!(AnsiDialect.literal(&Value::Real(100.0)).unwrap(), "100.0");
        assert!(AnsiDialect.literal(&Value::Real(f64::NAN)).is_err());
    }

    #[test]
    fn test_select_all_orders_by_primary_key() {
        let spec = TableSpec::new("order_lines", ["order_id", "line_no"]);
        assert_eq!(
            AnsiDialect.select_all_statement(&spec),
            "SELECT * FROM \"order_lines\" ORDER BY \"order_id\" ASC, \"line_no\" ASC"
        );
    }

    #[test]
    fn test_column_value_count_mismatch() {
        let err = AnsiDialect
            .insert_statement("items", &["a".to_string()], &[])
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}
