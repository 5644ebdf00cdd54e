//! Helpers shared by the dashboard pages.

use crate::error::GestaoResult;
use crate::selection::Selections;
use gestao_formatting::coerce_number;
use gestao_period::{distinct_options, ordered_options, FilterSet, PeriodRole};
use gestao_sheet::{CellValue, Sheet};
use serde::Serialize;

/// Shown instead of a page when its sheet has no rows.
pub const NO_DATA_WARNING: &str = "Planilha sem dados.";

/// Outcome of rendering a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Render<T> {
    /// The sheet is empty; nothing to show
    NoData { warning: String },
    Ready(T),
}

impl<T> Render<T> {
    pub fn no_data() -> Self {
        Render::NoData {
            warning: NO_DATA_WARNING.to_string(),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Render::Ready(value) => Some(value),
            Render::NoData { .. } => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Render<U> {
        match self {
            Render::Ready(value) => Render::Ready(f(value)),
            Render::NoData { warning } => Render::NoData { warning },
        }
    }
}

/// One multi-select filter control of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    /// Label shown to the user
    pub label: String,
    /// Column the control filters
    pub column: String,
    /// Set when the column holds periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<PeriodRole>,
    pub options: Vec<String>,
}

impl FilterControl {
    /// Control over a period column; options come from the resolver.
    pub fn period(
        sheet: &Sheet,
        label: &str,
        column: &str,
        role: PeriodRole,
    ) -> GestaoResult<Self> {
        let values = sheet.column_by_name(column)?;
        Ok(Self {
            label: label.to_string(),
            column: column.to_string(),
            role: Some(role),
            options: ordered_options(&values),
        })
    }

    /// Control over a plain column; options are its sorted distinct text.
    pub fn plain(sheet: &Sheet, label: &str, column: &str) -> GestaoResult<Self> {
        let values = sheet.column_by_name(column)?;
        Ok(Self {
            label: label.to_string(),
            column: column.to_string(),
            role: None,
            options: distinct_options(&values),
        })
    }
}

/// Filter `sheet` by whatever `selections` picks for each control.
/// Returns the number of rows removed.
pub fn apply_controls(
    sheet: &mut Sheet,
    controls: &[FilterControl],
    selections: &Selections,
) -> GestaoResult<usize> {
    for key in selections.keys() {
        if !controls
            .iter()
            .any(|c| Selections::key_matches(key, &c.label, &c.column))
        {
            tracing::warn!(filter = key, "ignoring filter on a column without a control");
        }
    }

    let mut filters = FilterSet::new();
    for control in controls {
        let picked = selections.get(&control.label, &control.column);
        match control.role {
            Some(_) => filters.add_period(&control.column, picked),
            None => filters.add_plain(&control.column, picked.iter().cloned()),
        };
    }
    Ok(filters.apply(sheet)?)
}

/// Drop the leading index column a spreadsheet export tends to carry: a
/// blank or `Unnamed` header, or numbers that never decrease.
pub fn drop_sequential_column(sheet: &mut Sheet) -> Option<String> {
    let first = sheet.column_names().first()?.clone();
    let header = first.trim().to_lowercase();
    let unnamed = header.is_empty() || header.starts_with("unnamed");

    if !unnamed && !is_non_decreasing_numbers(sheet) {
        return None;
    }
    sheet.column_delete(0).ok()?;
    tracing::debug!(column = %first, "dropped sequential column");
    Some(first)
}

fn is_non_decreasing_numbers(sheet: &Sheet) -> bool {
    let mut previous = f64::NEG_INFINITY;
    let mut seen = false;
    for row in sheet.rows() {
        let value = match &row[0] {
            CellValue::Int(i) => *i as f64,
            CellValue::Float(f) if f.is_finite() => *f,
            _ => return false,
        };
        if value < previous {
            return false;
        }
        previous = value;
        seen = true;
    }
    seen
}

/// Numeric values of a column; non-numeric cells count as zero. A missing
/// column yields zeros.
pub fn numeric_column(sheet: &Sheet, column: Option<&str>) -> Vec<f64> {
    let Some(idx) = column.and_then(|c| sheet.column_index_by_name(c).ok()) else {
        return vec![0.0; sheet.row_count()];
    };
    sheet
        .rows()
        .map(|row| coerce_number(&row[idx]).unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(header: &str, first: Vec<CellValue>) -> Sheet {
        let rows = first
            .into_iter()
            .map(|v| vec![v, CellValue::from("x")])
            .collect();
        Sheet::from_parts("t", vec![header.into(), "Área".into()], rows).unwrap()
    }

    #[test]
    fn test_drops_unnamed_header() {
        let mut s = sheet("Unnamed: 0", vec![CellValue::from("a")]);
        assert_eq!(drop_sequential_column(&mut s).as_deref(), Some("Unnamed: 0"));
        assert_eq!(s.column_names(), &["Área"]);
    }

    #[test]
    fn test_drops_increasing_index() {
        let mut s = sheet("#", vec![CellValue::Int(1), CellValue::Int(2), CellValue::Float(2.0)]);
        assert!(drop_sequential_column(&mut s).is_some());
    }

    #[test]
    fn test_keeps_real_first_column() {
        let mut s = sheet("ND", vec![CellValue::Int(3), CellValue::Int(1)]);
        assert!(drop_sequential_column(&mut s).is_none());
        let mut s = sheet("Analista", vec![CellValue::from("Ana"), CellValue::from("Bia")]);
        assert!(drop_sequential_column(&mut s).is_none());
        let mut s = sheet("ND", vec![]);
        assert!(drop_sequential_column(&mut s).is_none());
    }

    #[test]
    fn test_numeric_column_defaults_to_zero() {
        let s = sheet("Horas", vec![CellValue::Int(3), CellValue::from("n/a")]);
        assert_eq!(numeric_column(&s, Some("Horas")), vec![3.0, 0.0]);
        assert_eq!(numeric_column(&s, None), vec![0.0, 0.0]);
    }

    #[test]
    fn test_apply_controls_uses_labels() {
        let mut s = Sheet::from_data(vec![
            vec!["Período ND", "Status do Portal"],
            vec!["Set/25", "Aprovado"],
            vec!["Out/24", "Pendente"],
            vec!["Set/25", "Pendente"],
        ]);
        let controls = vec![
            FilterControl::period(&s, "Período ND", "Período ND", PeriodRole::Nd).unwrap(),
            FilterControl::plain(&s, "Status Portal", "Status do Portal").unwrap(),
        ];
        assert_eq!(controls[0].options, vec!["Out/24", "Set/25"]);

        let selections =
            Selections::from_pairs([("Período ND", "Set/25"), ("Status Portal", "Pendente")]);
        assert_eq!(apply_controls(&mut s, &controls, &selections).unwrap(), 2);
        assert_eq!(s.row_count(), 1);
    }

    #[test]
    fn test_render_serializes_untagged() {
        let empty: Render<Vec<u8>> = Render::no_data();
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({ "warning": "Planilha sem dados." })
        );
        let ready = Render::Ready(vec![1_u8]).map(|v| v.len());
        assert_eq!(serde_json::to_value(&ready).unwrap(), serde_json::json!(1));
    }
}
