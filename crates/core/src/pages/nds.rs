//! "NDs Realizadas": filtered debit notes with totals.

use crate::error::GestaoResult;
use crate::selection::Selections;
use crate::table::{apply_controls, drop_sequential_column, numeric_column, FilterControl, Render};
use gestao_formatting::{format_brl, format_integer};
use gestao_period::{detect_period_columns, find_column, period_display, PeriodColumns};
use gestao_sheet::{CellValue, Sheet};
use serde::Serialize;
use std::collections::BTreeMap;

/// File name of the detail export.
pub const EXPORT_FILE: &str = "nds_filtradas.xlsx";

/// Plain filters, in display order after the period filters.
const PLAIN_FILTERS: [&str; 6] = [
    "Área",
    "Analista",
    "Projeto",
    "Conta Contábil",
    "Status Portal",
    "ND",
];

const HOURS_COLUMN: &str = "Horas";
const VALUE_COLUMN: &str = "Valor";
const ACCOUNT_COLUMN: &str = "Conta Contábil";
const ACCOUNT_TOTAL_COLUMN: &str = "Total R$";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NdsMetrics {
    pub total_hours: f64,
    pub total_value: f64,
    /// `1.234`
    pub hours_display: String,
    /// `R$ 1.234,56`
    pub value_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NdsReport {
    pub filters: Vec<FilterControl>,
    pub period_columns: PeriodColumns,
    pub metrics: NdsMetrics,
    /// `None` when the sheet has no account column
    pub totals_by_account: Option<Sheet>,
    pub detail: Sheet,
}

/// Sheet with the sequential column removed, and its period roles.
fn prepare(mut sheet: Sheet) -> (Sheet, PeriodColumns) {
    drop_sequential_column(&mut sheet);
    let roles = detect_period_columns(sheet.column_names());
    (sheet, roles)
}

/// Filter controls in display order. Roles or labels without a column are
/// skipped and no column gets two controls.
fn controls(sheet: &Sheet, roles: &PeriodColumns) -> GestaoResult<Vec<FilterControl>> {
    let mut controls = Vec::new();
    for (role, column) in roles.resolved() {
        controls.push(FilterControl::period(sheet, role.label(), column, role)?);
    }

    // Period columns are already claimed; "ND" must not land on "Período ND".
    let candidates: Vec<&str> = sheet
        .column_names()
        .iter()
        .map(String::as_str)
        .filter(|c| !roles.is_period_column(c))
        .collect();

    for label in PLAIN_FILTERS {
        let Some(column) = find_column(&candidates, label) else {
            continue;
        };
        if controls.iter().any(|c| c.column == column) {
            continue;
        }
        controls.push(FilterControl::plain(sheet, label, column)?);
    }
    Ok(controls)
}

/// Filter controls for the page.
pub fn options(sheet: Sheet) -> GestaoResult<Render<Vec<FilterControl>>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    let (sheet, roles) = prepare(sheet);
    Ok(Render::Ready(controls(&sheet, &roles)?))
}

/// Filter the sheet and compute the page.
pub fn render(
    sheet: Sheet,
    selections: &Selections,
    hidden_columns: &[String],
) -> GestaoResult<Render<NdsReport>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    let (mut sheet, roles) = prepare(sheet);
    let filters = controls(&sheet, &roles)?;
    let removed = apply_controls(&mut sheet, &filters, selections)?;
    tracing::info!(rows = sheet.row_count(), removed, "filtered debit notes");

    let names = sheet.column_names().to_vec();
    let hours_column = find_column(&names, HOURS_COLUMN);
    let value_column = find_column(&names, VALUE_COLUMN);
    let values = numeric_column(&sheet, value_column);

    let total_hours: f64 = numeric_column(&sheet, hours_column).iter().sum();
    let total_value: f64 = values.iter().sum();
    let metrics = NdsMetrics {
        total_hours,
        total_value,
        hours_display: format_integer(total_hours),
        value_display: format_brl(total_value),
    };

    let totals_by_account = match find_column(&names, ACCOUNT_COLUMN) {
        Some(account) => Some(account_totals(&sheet, account, &values)?),
        None => None,
    };

    let detail = detail_table(sheet, &roles, hidden_columns)?;

    Ok(Render::Ready(NdsReport {
        filters,
        period_columns: roles,
        metrics,
        totals_by_account,
        detail,
    }))
}

/// Sum of `values` per account, sorted by account. Rows without an
/// account are left out.
fn account_totals(sheet: &Sheet, account: &str, values: &[f64]) -> GestaoResult<Sheet> {
    let idx = sheet.column_index_by_name(account)?;
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for (row, value) in sheet.rows().zip(values) {
        if row[idx].is_blank() {
            continue;
        }
        *totals.entry(row[idx].to_string()).or_default() += value;
    }

    let rows = totals
        .into_iter()
        .map(|(account, total)| vec![CellValue::from(account), CellValue::from(format_brl(total))])
        .collect();
    Ok(Sheet::from_parts(
        "Totais por Conta Contábil",
        vec![account.to_string(), ACCOUNT_TOTAL_COLUMN.to_string()],
        rows,
    )?)
}

/// Hidden columns removed and period cells shown as labels.
fn detail_table(
    mut sheet: Sheet,
    roles: &PeriodColumns,
    hidden_columns: &[String],
) -> GestaoResult<Sheet> {
    let hidden: Vec<&str> = hidden_columns.iter().map(String::as_str).collect();
    sheet.remove_columns(&hidden);

    for (_, column) in roles.resolved() {
        if sheet.has_column(column) {
            sheet.column_map_by_name(column, |v| CellValue::from(period_display(v)))?;
        }
    }
    sheet.set_name("NDs Realizadas");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn controle_nds() -> Sheet {
        let sept = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let header = [
            "Unnamed: 0",
            "ND",
            "Período ND",
            "Periodo_Fechamento",
            "Área",
            "Analista",
            "Conta Contábil",
            "Empresa",
            "Horas",
            "Valor",
        ];
        let row = |i: i64, period: CellValue, area: &str, account: &str, hours: i64, value: f64| {
            vec![
                CellValue::Int(i),
                CellValue::from(format!("ND-{i}")),
                period,
                CellValue::from("Out/25"),
                CellValue::from(area),
                CellValue::from("Ana"),
                CellValue::from(account),
                CellValue::from("EIC"),
                CellValue::Int(hours),
                CellValue::Float(value),
            ]
        };
        Sheet::from_parts(
            "Controle NDs",
            header.iter().map(|h| h.to_string()).collect(),
            vec![
                row(1, CellValue::from(sept), "TI", "4100", 1000, 1500.0),
                row(2, CellValue::from("Conjunto/25"), "RH", "4200", 250, 99.99),
                row(3, CellValue::from("Out/24"), "TI", "4100", 40, 10.0),
                row(4, CellValue::from("blah"), "TI", "", 1, 1.0),
            ],
        )
        .unwrap()
    }

    fn hidden() -> Vec<String> {
        vec!["Empresa".into(), "Conta Destino".into(), "Aprovador".into()]
    }

    #[test]
    fn test_controls_in_display_order() {
        let controls = options(controle_nds()).unwrap().ready().unwrap();
        let labels: Vec<&str> = controls.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Período ND", "Período Fechamento", "Área", "Analista", "Conta Contábil", "ND"]
        );
        assert_eq!(controls[0].options, vec!["Out/24", "Set/25", "blah"]);
        assert_eq!(controls[5].column, "ND");
    }

    #[test]
    fn test_unfiltered_metrics() {
        let report = render(controle_nds(), &Selections::new(), &hidden())
            .unwrap()
            .ready()
            .unwrap();
        assert_eq!(report.metrics.hours_display, "1.291");
        assert_eq!(report.metrics.value_display, "R$ 1.610,99");
    }

    #[test]
    fn test_period_filter_and_account_totals() {
        let selections = Selections::from_pairs([("Período ND", "Set/25")]);
        let report = render(controle_nds(), &selections, &hidden())
            .unwrap()
            .ready()
            .unwrap();

        assert_eq!(report.detail.row_count(), 2);
        assert_eq!(report.metrics.value_display, "R$ 1.599,99");

        let totals = report.totals_by_account.unwrap();
        assert_eq!(
            totals.to_string_grid(),
            vec![
                vec!["Conta Contábil", "Total R$"],
                vec!["4100", "R$ 1.500,00"],
                vec!["4200", "R$ 99,99"],
            ]
        );
    }

    #[test]
    fn test_detail_hides_columns_and_shows_labels() {
        let report = render(controle_nds(), &Selections::new(), &hidden())
            .unwrap()
            .ready()
            .unwrap();
        let detail = report.detail;
        assert!(!detail.has_column("Empresa"));
        assert!(!detail.has_column("Unnamed: 0"));
        assert_eq!(
            detail.column_by_name("Período ND").unwrap(),
            vec![
                CellValue::from("Set/25"),
                CellValue::from("Set/25"),
                CellValue::from("Out/24"),
                CellValue::from(""),
            ]
        );
    }

    #[test]
    fn test_empty_sheet_warns() {
        let empty = Sheet::from_parts("Controle NDs", vec!["Valor".into()], vec![]).unwrap();
        assert_eq!(
            render(empty, &Selections::new(), &hidden()).unwrap(),
            Render::no_data()
        );
    }
}
