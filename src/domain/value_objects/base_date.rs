use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Operator-entered calendar day for a batch. No time component and no timezone:
/// offsets are whole calendar days, so DST transitions cannot shift the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseDate(NaiveDate);

impl BaseDate {
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Base date cannot be empty".to_string());
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| format!("Invalid base date '{trimmed}': {e}"))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn plus_days(&self, days: u64) -> NaiveDate {
        self.0
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for BaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for BaseDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BaseDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BaseDate> for String {
    fn from(date: BaseDate) -> Self {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_cross_month_and_year_boundaries() {
        let date = BaseDate::parse("2024-12-31").unwrap();
        assert_eq!(date.plus_days(1).to_string(), "2025-01-01");

        let leap = BaseDate::parse("2024-02-28").unwrap();
        assert_eq!(leap.plus_days(2).to_string(), "2024-03-01");
    }

    #[test]
    fn offsets_ignore_dst_transitions() {
        // last Sunday of March: clocks change in most of Europe
        let date = BaseDate::parse("2024-03-30").unwrap();
        assert_eq!(date.plus_days(1).to_string(), "2024-03-31");
        assert_eq!(date.plus_days(2).to_string(), "2024-04-01");
    }

    #[test]
    fn rejects_blank_and_malformed_input() {
        assert!(BaseDate::parse("   ").is_err());
        assert!(BaseDate::parse("10/06/2024").is_err());
        assert!(BaseDate::parse("2024-13-01").is_err());
    }
}
