//! Row filtering by user selections.
//!
//! Every filter follows the same rule: an empty selection places no
//! constraint on its column. Filters combine conjunctively.

use crate::convert::format_period;
use crate::label::PeriodLabel;
use gestao_sheet::{CellValue, Sheet, SheetError};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    /// Cells are compared by resolved label. Selections that are not labels
    /// match unresolved cells by their text.
    Period {
        labels: HashSet<PeriodLabel>,
        unresolved: HashSet<String>,
    },
    /// Cells are compared by their text.
    Plain(HashSet<String>),
}

impl Selection {
    fn is_empty(&self) -> bool {
        match self {
            Selection::Period { labels, unresolved } => labels.is_empty() && unresolved.is_empty(),
            Selection::Plain(values) => values.is_empty(),
        }
    }

    fn matches(&self, value: &CellValue) -> bool {
        match self {
            Selection::Period { labels, unresolved } => match format_period(value) {
                Some(label) => labels.contains(&label),
                None => unresolved.contains(&value.to_string()),
            },
            Selection::Plain(values) => values.contains(&value.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnFilter {
    column: String,
    selection: Selection,
}

/// A set of column selections applied together to a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<ColumnFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter a period column by labels such as `"Set/25"`.
    pub fn add_period<I, S>(&mut self, column: &str, selected: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = HashSet::new();
        let mut unresolved = HashSet::new();
        for choice in selected {
            let choice = choice.as_ref();
            match choice.parse::<PeriodLabel>() {
                Ok(label) => {
                    labels.insert(label);
                }
                Err(_) => {
                    unresolved.insert(choice.to_string());
                }
            }
        }
        self.push(column, Selection::Period { labels, unresolved })
    }

    /// Filter a plain column by exact cell text.
    pub fn add_plain<I, S>(&mut self, column: &str, selected: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = selected.into_iter().map(Into::into).collect();
        self.push(column, Selection::Plain(values))
    }

    fn push(&mut self, column: &str, selection: Selection) -> &mut Self {
        if !selection.is_empty() {
            self.filters.push(ColumnFilter {
                column: column.to_string(),
                selection,
            });
        }
        self
    }

    /// True when no column carries a non-empty selection
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Columns constrained by this set, in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.column.as_str())
    }

    /// Drop rows that fail any selection. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `ColumnNotFound` when a filtered column is absent.
    pub fn apply(&self, sheet: &mut Sheet) -> Result<usize, SheetError> {
        let resolved = self
            .filters
            .iter()
            .map(|f| Ok((sheet.column_index_by_name(&f.column)?, &f.selection)))
            .collect::<Result<Vec<_>, SheetError>>()?;

        let removed = sheet.filter_rows(|row| {
            resolved
                .iter()
                .all(|(idx, selection)| selection.matches(&row[*idx]))
        });
        tracing::debug!(filters = self.filters.len(), removed, "applied filters");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Sheet {
        Sheet::from_parts(
            "Controle NDs",
            vec!["Período ND".into(), "Área".into()],
            vec![
                vec![CellValue::from("Set/25"), CellValue::from("TI")],
                vec![
                    CellValue::from(NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()),
                    CellValue::from("RH"),
                ],
                vec![CellValue::from("Out/24"), CellValue::from("TI")],
                vec![CellValue::from("blah"), CellValue::from("TI")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_selection_passes_through() {
        let mut sheet = sample();
        let mut filters = FilterSet::new();
        filters
            .add_period("Período ND", Vec::<String>::new())
            .add_plain("Área", Vec::<String>::new());
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&mut sheet).unwrap(), 0);
        assert_eq!(sheet.row_count(), 4);
    }

    #[test]
    fn test_period_selection_matches_resolved_label() {
        let mut sheet = sample();
        let mut filters = FilterSet::new();
        filters.add_period("Período ND", ["set/25"]);
        filters.apply(&mut sheet).unwrap();
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_unresolved_choice_matches_raw_text() {
        let mut sheet = sample();
        let mut filters = FilterSet::new();
        filters.add_period("Período ND", ["blah"]);
        filters.apply(&mut sheet).unwrap();
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let mut sheet = sample();
        let mut filters = FilterSet::new();
        filters
            .add_period("Período ND", ["Set/25", "Out/24"])
            .add_plain("Área", ["TI"]);
        assert_eq!(filters.apply(&mut sheet).unwrap(), 2);
        assert_eq!(
            filters.columns().collect::<Vec<_>>(),
            vec!["Período ND", "Área"]
        );
    }

    #[test]
    fn test_missing_column_is_reported() {
        let mut sheet = sample();
        let mut filters = FilterSet::new();
        filters.add_plain("Projeto", ["X"]);
        assert!(matches!(
            filters.apply(&mut sheet),
            Err(SheetError::ColumnNotFound { .. })
        ));
    }
}
