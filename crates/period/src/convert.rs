//! Cell value to period label conversion.
//!
//! Source sheets mix real date cells with hand-typed abbreviations
//! (`"Set/25"`, `"setembro 2025"`) and the occasional OCR-style typo
//! (`"Conjunto/25"`). Conversion tries a structured date first and falls
//! back to a keyword scan of the text; anything left over is unresolved.

use crate::label::PeriodLabel;
use crate::normalize::normalize_free_text;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use gestao_sheet::{excel_serial_to_datetime, CellValue};
use regex::Regex;
use std::ops::Range;

/// Keywords per month, January first. A month matches when an alphabetic
/// token of the text starts with one of its keywords.
const MONTH_KEYWORDS: [&[&str]; 12] = [
    &["jan", "janeiro", "january"],
    &["fev", "fevereiro", "feb", "february"],
    &["mar", "marco", "march"],
    &["abr", "abril", "apr", "april"],
    &["mai", "maio", "may"],
    &["jun", "junho", "june"],
    &["jul", "julho", "july"],
    &["ago", "agosto", "aug", "august"],
    // "conj*" is how "Set" comes out of the scanned monthly closing sheets.
    &[
        "set", "setembro", "sep", "sept", "september", "conj", "conjun", "conjunto",
    ],
    &["out", "outubro", "oct", "october"],
    &["nov", "novembro", "november"],
    &["dez", "dezembro", "dec", "december"],
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Years a structured date may carry. Guards against format strings
/// accepting short years (`"01-09-25"` read as year 1).
const PLAUSIBLE_YEARS: Range<i32> = 1900..2100;

/// Serial dates are only trusted inside the two-digit-year window.
const SERIAL_YEARS: Range<i32> = 2000..2100;

fn year_month_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?P<y1>\d{4})-(?P<m1>\d{1,2})|(?P<m2>\d{1,2})/(?P<y2>\d{4}))$")
            .expect("valid regex")
    })
}

fn four_digit_year_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\D)(20\d{2})(?:\D|$)").expect("valid regex"))
}

fn trailing_two_digit_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\D)(\d{2})\s*$").expect("valid regex"))
}

fn digits_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Convert a cell to its period label, or `None` when it is unresolved.
///
/// Never fails on malformed input.
///
/// ```
/// use gestao_period::format_period;
/// use gestao_sheet::CellValue;
///
/// assert_eq!(format_period(&CellValue::from("Conjunto/25")).unwrap().to_string(), "Set/25");
/// assert!(format_period(&CellValue::from("blah")).is_none());
/// ```
pub fn format_period(value: &CellValue) -> Option<PeriodLabel> {
    structured_date(value)
        .map(PeriodLabel::from_date)
        .or_else(|| match value {
            CellValue::String(text) => free_text_period(text),
            _ => None,
        })
}

/// Label text for display; unresolved cells render as an empty string.
pub fn period_display(value: &CellValue) -> String {
    format_period(value)
        .map(|label| label.to_string())
        .unwrap_or_default()
}

/// Interpret a cell as a calendar date: typed date cells, serial numbers
/// and date-shaped strings.
fn structured_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(dt) => Some(dt.date()),
        CellValue::Int(i) => serial_date(*i as f64),
        CellValue::Float(f) => serial_date(*f),
        CellValue::String(text) => parse_date_text(text.trim()),
        CellValue::Null | CellValue::Bool(_) => None,
    }
}

fn serial_date(serial: f64) -> Option<NaiveDate> {
    excel_serial_to_datetime(serial)
        .map(|dt| dt.date())
        .filter(|d| SERIAL_YEARS.contains(&d.year()))
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .find(|d| PLAUSIBLE_YEARS.contains(&d.year()))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
                .find(|d| PLAUSIBLE_YEARS.contains(&d.year()))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| parse_year_month(text));

    parsed.filter(|d| PLAUSIBLE_YEARS.contains(&d.year()))
}

/// `2025-09` and `09/2025`, taken as the first day of the month.
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let caps = year_month_re().captures(text)?;
    let year = caps.name("y1").or_else(|| caps.name("y2"))?.as_str();
    let month = caps.name("m1").or_else(|| caps.name("m2"))?.as_str();
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Keyword-driven parse of hand-typed periods.
fn free_text_period(raw: &str) -> Option<PeriodLabel> {
    let text = normalize_free_text(raw);
    let (year, year_span) = extract_year(&text)?;
    let month = keyword_month(&text).or_else(|| numeral_month(&text, &year_span))?;
    PeriodLabel::new(year, month)
}

/// A `20YY` run wins; otherwise a trailing two-digit run means `20YY`.
fn extract_year(text: &str) -> Option<(i32, Range<usize>)> {
    let caps = four_digit_year_re()
        .captures(text)
        .or_else(|| trailing_two_digit_re().captures(text))?;
    let m = caps.get(1)?;
    let digits: i32 = m.as_str().parse().ok()?;
    let year = if m.as_str().len() == 2 {
        2000 + digits
    } else {
        digits
    };
    Some((year, m.range()))
}

fn keyword_month(text: &str) -> Option<u32> {
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();

    MONTH_KEYWORDS
        .iter()
        .position(|keywords| {
            keywords
                .iter()
                .any(|kw| tokens.iter().any(|token| token.starts_with(kw)))
        })
        .map(|idx| idx as u32 + 1)
}

/// A bare one- or two-digit number in `1..=12` outside the year digits.
fn numeral_month(text: &str, year_span: &Range<usize>) -> Option<u32> {
    digits_re()
        .find_iter(text)
        .filter(|m| m.end() <= year_span.start || m.start() >= year_span.end)
        .filter(|m| m.as_str().len() <= 2)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .find(|n| (1..=12).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: impl Into<CellValue>) -> Option<String> {
        format_period(&value.into()).map(|l| l.to_string())
    }

    #[test]
    fn test_typed_abbreviations() {
        assert_eq!(label("Set/25").as_deref(), Some("Set/25"));
        assert_eq!(label("out/24").as_deref(), Some("Out/24"));
        assert_eq!(label("MAR/2025").as_deref(), Some("Mar/25"));
    }

    #[test]
    fn test_full_month_names() {
        assert_eq!(label("Março 2025").as_deref(), Some("Mar/25"));
        assert_eq!(label("setembro/25").as_deref(), Some("Set/25"));
        assert_eq!(label("December-24").as_deref(), Some("Dez/24"));
    }

    #[test]
    fn test_malformed_september_alias() {
        assert_eq!(label("Conjunto/25").as_deref(), Some("Set/25"));
        assert_eq!(label("conj/25").as_deref(), Some("Set/25"));
        assert_eq!(label("Sep 2025").as_deref(), Some("Set/25"));
    }

    #[test]
    fn test_native_date() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(label(date).as_deref(), Some("Set/25"));
    }

    #[test]
    fn test_date_strings() {
        assert_eq!(label("2025-09-01").as_deref(), Some("Set/25"));
        assert_eq!(label("2024-10-15 00:00:00").as_deref(), Some("Out/24"));
        assert_eq!(label("15/10/2024").as_deref(), Some("Out/24"));
        assert_eq!(label("2025-02").as_deref(), Some("Fev/25"));
        assert_eq!(label("02/2025").as_deref(), Some("Fev/25"));
    }

    #[test]
    fn test_numeral_month_fallback() {
        assert_eq!(label("9/25").as_deref(), Some("Set/25"));
        assert_eq!(label("mes 11 de 2024").as_deref(), Some("Nov/24"));
    }

    #[test]
    fn test_serial_numbers() {
        assert_eq!(label(45901_i64).as_deref(), Some("Set/25"));
        assert_eq!(label(45901.0).as_deref(), Some("Set/25"));
        // Plain counts are not dates.
        assert_eq!(label(12_i64), None);
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(label("blah"), None);
        assert_eq!(label("Set"), None);
        assert_eq!(label("25"), None);
        assert_eq!(label(""), None);
        assert_eq!(label(true), None);
        assert_eq!(format_period(&CellValue::Null), None);
    }

    #[test]
    fn test_period_display() {
        assert_eq!(period_display(&CellValue::from("Set/25")), "Set/25");
        assert_eq!(period_display(&CellValue::from("xyz")), "");
    }
}
