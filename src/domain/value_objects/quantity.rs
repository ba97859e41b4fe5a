use serde::{Serialize, Serializer};
use std::fmt;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Numeric field coerced from free-text input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Quantity(f64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0.0);

    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Empty, non-numeric or non-finite text becomes zero. Never fails.
    pub fn coerce(input: Option<&str>) -> Self {
        let text = match input {
            Some(text) => text.trim(),
            None => return Self::ZERO,
        };
        if text.is_empty() {
            return Self::ZERO;
        }
        text.parse::<f64>().map(Self::new).unwrap_or(Self::ZERO)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_whole(&self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT_INT
    }
}

/// Bucket counts: coerced like any quantity, then truncated to a non-negative integer.
pub fn coerce_count(input: Option<&str>) -> u32 {
    let value = Quantity::coerce(input).value();
    if value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value.trunc() as u32
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.is_whole() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_never_fails() {
        assert_eq!(Quantity::coerce(None).value(), 0.0);
        assert_eq!(Quantity::coerce(Some("")).value(), 0.0);
        assert_eq!(Quantity::coerce(Some("  ")).value(), 0.0);
        assert_eq!(Quantity::coerce(Some("abc")).value(), 0.0);
        assert_eq!(Quantity::coerce(Some("NaN")).value(), 0.0);
        assert_eq!(Quantity::coerce(Some("inf")).value(), 0.0);
        assert_eq!(Quantity::coerce(Some(" 60.5 ")).value(), 60.5);
        assert_eq!(Quantity::coerce(Some("-3")).value(), -3.0);
    }

    #[test]
    fn counts_are_non_negative_integers() {
        assert_eq!(coerce_count(Some("3")), 3);
        assert_eq!(coerce_count(Some("2.9")), 2);
        assert_eq!(coerce_count(Some("-4")), 0);
        assert_eq!(coerce_count(Some("x")), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Quantity::new(18.0)).unwrap(), "18");
        assert_eq!(serde_json::to_string(&Quantity::new(18.5)).unwrap(), "18.5");
    }
}
