//! Deterministic value generators for synthetic fixture columns.
//!
//! A [`ValueGenerator`] is an immutable description of a sequence. Rows pull
//! values through a [`GeneratorCursor`], which owns its own position, so two
//! columns generated side by side never influence each other.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::Value;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar unit a [`ValueGenerator::DateSequence`] steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateUnit {
    Days,
}

/// Closed-form description of a column value sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueGenerator {
    /// `start + step * n`
    ConstantSequence { start: i64, step: i64 },
    /// `prefix + zero-pad(start + step * n, width)`
    PaddedStringSequence {
        prefix: String,
        start: i64,
        step: i64,
        width: usize,
    },
    /// `start + step * n` units
    DateSequence {
        start: NaiveDate,
        step: i64,
        unit: DateUnit,
    },
    /// The same value for every row
    RepeatingValue { value: Value },
}

impl ValueGenerator {
    pub fn constant_sequence(start: i64, step: i64) -> Self {
        ValueGenerator::ConstantSequence { start, step }
    }

    pub fn padded_string_sequence(
        prefix: impl Into<String>,
        start: i64,
        step: i64,
        width: usize,
    ) -> Self {
        ValueGenerator::PaddedStringSequence {
            prefix: prefix.into(),
            start,
            step,
            width,
        }
    }

    pub fn date_sequence(start: NaiveDate, step: i64, unit: DateUnit) -> Self {
        ValueGenerator::DateSequence { start, step, unit }
    }

    pub fn repeating(value: impl Into<Value>) -> Self {
        ValueGenerator::RepeatingValue {
            value: value.into(),
        }
    }

    /// Value at zero-based position `index`.
    ///
    /// # Errors
    ///
    /// - `Format` - the numeric term overflows, a padded value is negative or
    ///   needs more digits than `width`, or a date falls outside the calendar
    pub fn value_at(&self, index: u64) -> Result<Value> {
        match self {
            ValueGenerator::ConstantSequence { start, step } => {
                Ok(Value::Integer(term(*start, *step, index)?))
            }
            ValueGenerator::PaddedStringSequence {
                prefix,
                start,
                step,
                width,
            } => {
                let n = term(*start, *step, index)?;
                if n < 0 {
                    return Err(format_error(format!(
                        "padded sequence value {} at index {} is negative",
                        n, index
                    )));
                }
                let digits = n.to_string();
                if digits.len() > *width {
                    return Err(format_error(format!(
                        "value {} at index {} needs {} digits but width is {}",
                        n,
                        index,
                        digits.len(),
                        width
                    )));
                }
                Ok(Value::Text(format!(
                    "{}{:0>width$}",
                    prefix,
                    digits,
                    width = *width
                )))
            }
            ValueGenerator::DateSequence { start, step, unit } => {
                let offset = term(0, *step, index)?;
                let shifted = match unit {
                    DateUnit::Days if offset >= 0 => {
                        start.checked_add_days(Days::new(offset.unsigned_abs()))
                    }
                    DateUnit::Days => start.checked_sub_days(Days::new(offset.unsigned_abs())),
                };
                shifted.map(Value::Date).ok_or_else(|| {
                    format_error(format!(
                        "date {} shifted by {} days at index {} is out of range",
                        start, offset, index
                    ))
                })
            }
            ValueGenerator::RepeatingValue { value } => Ok(value.clone()),
        }
    }

    /// A fresh cursor positioned at the first element.
    pub fn cursor(&self) -> GeneratorCursor<'_> {
        GeneratorCursor {
            generator: self,
            position: 0,
        }
    }
}

fn term(start: i64, step: i64, index: u64) -> Result<i64> {
    i64::try_from(index)
        .ok()
        .and_then(|i| step.checked_mul(i))
        .and_then(|offset| start.checked_add(offset))
        .ok_or_else(|| {
            format_error(format!(
                "sequence term {} + {} * {} overflows a 64-bit integer",
                start, step, index
            ))
        })
}

fn format_error(message: String) -> ExError {
    ExError::new(ExErrorKind::Format)
        .with_op("generate_value")
        .with_message(message)
}

/// Stateful reader over a [`ValueGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorCursor<'a> {
    generator: &'a ValueGenerator,
    position: u64,
}

impl GeneratorCursor<'_> {
    /// Produce the current element and advance.
    ///
    /// # Errors
    ///
    /// - `Format` - see [`ValueGenerator::value_at`]; the cursor does not
    ///   advance past a failing element
    pub fn next_value(&mut self) -> Result<Value> {
        let value = self.generator.value_at(self.position)?;
        self.position += 1;
        Ok(value)
    }

    /// Number of values produced so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Iterator for GeneratorCursor<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_value())
    }
}
