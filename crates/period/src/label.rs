use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Portuguese month abbreviations, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// A calendar month rendered as `Mon/YY` (`Set/25`).
///
/// Equality and ordering only look at `(year, month)`, so two labels that
/// differ in the casing of their text form compare equal once parsed.
///
/// The text only carries two year digits, so the year is always held in
/// `2000..=2099`: a 1925 date and a 2025 date give the same label, and
/// parsing a label gives back the year it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodLabel {
    year: i32,
    month: u32,
}

/// Error returned when a string is not a canonical period label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a period label: {0:?}")]
pub struct ParseLabelError(String);

impl PeriodLabel {
    /// Build a label; `month` must be in `1..=12`. The year keeps its last
    /// two digits and is moved into the 2000s.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self {
            year: century_year(year),
            month,
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: century_year(date.year()),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Portuguese abbreviation of the month (`"Set"`).
    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }
}

fn century_year(year: i32) -> i32 {
    2000 + year.rem_euclid(100)
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.abbreviation(), self.year.rem_euclid(100))
    }
}

impl FromStr for PeriodLabel {
    type Err = ParseLabelError;

    /// Parse the canonical `Mon/YY` form, ignoring case and surrounding
    /// whitespace. The two-digit year expands to `20YY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLabelError(s.to_string());
        let (month_text, year_text) = s.trim().split_once('/').ok_or_else(err)?;

        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|abbr| abbr.eq_ignore_ascii_case(month_text.trim()))
            .ok_or_else(err)?;

        let year_text = year_text.trim();
        if year_text.len() != 2 || !year_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let yy: i32 = year_text.parse().map_err(|_| err())?;

        Ok(Self {
            year: 2000 + yy,
            month: month as u32 + 1,
        })
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PeriodLabel::new(2025, 9).unwrap().to_string(), "Set/25");
        assert_eq!(PeriodLabel::new(2003, 1).unwrap().to_string(), "Jan/03");
        assert_eq!(PeriodLabel::new(2024, 12).unwrap().to_string(), "Dez/24");
    }

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(PeriodLabel::new(2025, 0).is_none());
        assert!(PeriodLabel::new(2025, 13).is_none());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let upper: PeriodLabel = "SET/25".parse().unwrap();
        let lower: PeriodLabel = "set/25".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, PeriodLabel::new(2025, 9).unwrap());
    }

    #[test]
    fn test_parse_rejects_non_labels() {
        assert!("Set/2025".parse::<PeriodLabel>().is_err());
        assert!("Setembro/25".parse::<PeriodLabel>().is_err());
        assert!("blah".parse::<PeriodLabel>().is_err());
    }

    #[test]
    fn test_year_is_held_in_the_2000s() {
        let old = PeriodLabel::from_date(NaiveDate::from_ymd_opt(1925, 9, 1).unwrap());
        let new = PeriodLabel::from_date(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(old, new);
        assert_eq!(old.year(), 2025);
        assert_eq!(PeriodLabel::new(1999, 5).unwrap().year(), 2099);
        let parsed: PeriodLabel = "Mai/99".parse().unwrap();
        assert_eq!(parsed, PeriodLabel::new(1999, 5).unwrap());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let dez24 = PeriodLabel::new(2024, 12).unwrap();
        let jan25 = PeriodLabel::new(2025, 1).unwrap();
        assert!(dez24 < jan25);
    }

    #[test]
    fn test_serializes_as_text() {
        let label = PeriodLabel::new(2024, 10).unwrap();
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"Out/24\"");
    }
}
