//! Filter choices built from column values.

use crate::convert::format_period;
use crate::label::PeriodLabel;
use gestao_sheet::CellValue;
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct choices of a period column, split by whether they resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodOptions {
    /// Chronological, no duplicates
    pub resolved: Vec<PeriodLabel>,
    /// Original text of cells that never resolved, lexicographic
    pub unresolved: Vec<String>,
}

impl PeriodOptions {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resolved.len() + self.unresolved.len()
    }

    /// Resolved labels followed by the unresolved bucket.
    pub fn into_strings(self) -> Vec<String> {
        self.resolved
            .iter()
            .map(ToString::to_string)
            .chain(self.unresolved)
            .collect()
    }
}

/// Resolve every value and bucket the results. Only null cells are
/// skipped; whitespace-only text lands in the unresolved bucket.
pub fn period_options<'a, I>(values: I) -> PeriodOptions
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut resolved = BTreeSet::new();
    let mut unresolved = BTreeSet::new();

    for value in values {
        if value.is_null() {
            continue;
        }
        match format_period(value) {
            Some(label) => {
                resolved.insert(label);
            }
            None => {
                unresolved.insert(value.to_string());
            }
        }
    }

    if !unresolved.is_empty() {
        tracing::debug!(count = unresolved.len(), "unresolved period values");
    }

    PeriodOptions {
        resolved: resolved.into_iter().collect(),
        unresolved: unresolved.into_iter().collect(),
    }
}

/// Choices for a period filter control: labels in `(year, month)` order,
/// then unresolved text in lexicographic order.
///
/// ```
/// use gestao_period::ordered_options;
/// use gestao_sheet::CellValue;
///
/// let values: Vec<CellValue> = ["Set/25", "Set/25", "Out/24", "xyz"]
///     .into_iter()
///     .map(CellValue::from)
///     .collect();
/// assert_eq!(ordered_options(&values), vec!["Out/24", "Set/25", "xyz"]);
/// ```
pub fn ordered_options<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    period_options(values).into_strings()
}

/// Sorted distinct text of a plain (non-period) column.
pub fn distinct_options<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values
        .into_iter()
        .filter(|v| !v.is_blank())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().copied().map(CellValue::from).collect()
    }

    #[test]
    fn test_duplicates_collapse_across_spellings() {
        let values = cells(&["Set/25", "set/2025", "2025-09-14", "Conjunto/25"]);
        let options = period_options(&values);
        assert_eq!(options.resolved, vec![PeriodLabel::new(2025, 9).unwrap()]);
        assert!(options.unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_after_resolved() {
        let values = cells(&["zzz", "Jan/25", "aaa", "Dez/24"]);
        assert_eq!(ordered_options(&values), vec!["Dez/24", "Jan/25", "aaa", "zzz"]);
    }

    #[test]
    fn test_only_nulls_are_skipped() {
        let values = vec![CellValue::Null, CellValue::from("  "), CellValue::from("Mai/25")];
        assert_eq!(ordered_options(&values), vec!["Mai/25", "  "]);
    }

    #[test]
    fn test_empty_input() {
        let options = period_options(std::iter::empty());
        assert!(options.is_empty());
        assert_eq!(options.len(), 0);
    }

    #[test]
    fn test_distinct_options() {
        let values = cells(&["TI", "RH", "TI", ""]);
        assert_eq!(distinct_options(&values), vec!["RH", "TI"]);
    }
}
