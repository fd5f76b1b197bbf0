//! Scalar column values.
//!
//! `Value` is the unit exchanged with the store: generators produce it,
//! dialects render it as a literal and snapshots read it back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Integer(_) | Value::Real(_) => 1,
            Value::Text(_) => 2,
            Value::Date(_) => 3,
            Value::Blob(_) => 4,
        }
    }

    /// Total order used for primary-key sorting.
    ///
    /// Null sorts first, then numbers (integers and reals compared
    /// numerically), text, dates and blobs.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Integer(a), Value::Real(b)) => cmp_integer_real(*a, *b),
            (Value::Real(a), Value::Integer(b)) => cmp_integer_real(*b, *a).reverse(),
            (Value::Real(a), Value::Real(b)) => cmp_reals(*a, *b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Blob(a), Value::Blob(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

/// Numeric order with `-0.0 == 0.0`; NaNs sort after (positive) or before
/// (negative) every number.
fn cmp_reals(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a real, without rounding the integer
/// through `f64`.
fn cmp_integer_real(i: i64, r: f64) -> Ordering {
    // 2^63, the first real above every i64
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if r.is_nan() {
        return if r.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if r >= I64_BOUND {
        return Ordering::Less;
    }
    if r < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = r.trunc();
    // exact: whole is integral and within i64 range
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(r - whole)).unwrap_or(Ordering::Equal),
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:?}", r),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Blob(b) => write!(f, "x'{}'", hex::encode(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Primary-key tuple of a row, ordered with [`Value::sort_cmp`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryKey(Vec<Value>);

impl PrimaryKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl PartialEq for PrimaryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PrimaryKey {}

impl PartialOrd for PrimaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrimaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.sort_cmp(b) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

impl From<Vec<Value>> for PrimaryKey {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Value> for PrimaryKey {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<i64> for PrimaryKey {
    fn from(v: i64) -> Self {
        Self(vec![Value::Integer(v)])
    }
}

impl From<i32> for PrimaryKey {
    fn from(v: i32) -> Self {
        Self(vec![Value::Integer(i64::from(v))])
    }
}

impl From<&str> for PrimaryKey {
    fn from(v: &str) -> Self {
        Self(vec![Value::from(v)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_cmp_is_exact_beyond_f64_precision() {
        let above = Value::Integer((1 << 53) + 1);
        let exact = Value::Integer(1 << 53);
        let real = Value::Real(9_007_199_254_740_992.0);

        assert_eq!(exact.sort_cmp(&real), Ordering::Equal);
        assert_eq!(above.sort_cmp(&real), Ordering::Greater);
        assert_eq!(real.sort_cmp(&above), Ordering::Less);
        assert_ne!(PrimaryKey::from(above), PrimaryKey::from(real));
    }

    #[test]
    fn test_sort_cmp_integer_against_fractional_and_extreme_reals() {
        assert_eq!(Value::Integer(-2).sort_cmp(&Value::Real(-1.5)), Ordering::Less);
        assert_eq!(Value::Integer(-1).sort_cmp(&Value::Real(-1.5)), Ordering::Greater);
        assert_eq!(Value::Integer(i64::MAX).sort_cmp(&Value::Real(1e19)), Ordering::Less);
        assert_eq!(Value::Integer(i64::MIN).sort_cmp(&Value::Real(-1e19)), Ordering::Greater);
        assert_eq!(Value::Integer(i64::MIN).sort_cmp(&Value::Real(-9.223372036854775808e18)), Ordering::Equal);
        assert_eq!(Value::Integer(0).sort_cmp(&Value::Real(-0.0)), Ordering::Equal);
        assert_eq!(Value::Integer(0).sort_cmp(&Value::Real(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn test_sort_cmp_mixes_integers_and_reals_numerically() {
        assert_eq!(
            Value::Integer(2).sort_cmp(&Value::Real(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            Value::Real(2.0).sort_cmp(&Value::Integer(2)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(Value::Null.sort_cmp(&Value::Integer(i64::MIN)), Ordering::Less);
        assert_eq!(Value::Text("a".into()).sort_cmp(&Value::Null), Ordering::Greater);
    }

    #[test]
    fn test_primary_key_ordering_is_lexicographic() {
        let a = PrimaryKey::new(vec![Value::Integer(1), Value::from("b")]);
        let b = PrimaryKey::new(vec![Value::Integer(1), Value::from("c")]);
        let c = PrimaryKey::new(vec![Value::Integer(2), Value::from("a")]);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Real(120.0).to_string(), "120.0");
        assert_eq!(Value::from("A0001").to_string(), "\"A0001\"");
        assert_eq!(PrimaryKey::from(7).to_string(), "(7)");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
