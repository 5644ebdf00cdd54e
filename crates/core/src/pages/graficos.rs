//! "Gráficos NDs": reclassified value per area over time.

use crate::error::{GestaoError, GestaoResult};
use crate::selection::Selections;
use crate::table::{apply_controls, FilterControl, Render};
use gestao_formatting::{coerce_number, format_brl};
use gestao_period::{detect_period_columns, find_column, format_period, period_options, PeriodRole};
use gestao_sheet::{CellValue, Sheet};
use gestao_viz::ChartSpec;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const TITLE: &str = "Reclassificações por Área ao longo do tempo";

/// Export name of the chart, without extension.
pub const CHART_FILE_STEM: &str = "grafico_reclassificacoes";

const PERIOD: &str = "Período ND";
const VALUE: &str = "Valor";
const AREA: &str = "Área";
const PROJECT: &str = "Projeto";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraficosReport {
    pub filters: Vec<FilterControl>,
    /// One row per (period, area) with the summed value
    pub grouped: Sheet,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone)]
struct Columns {
    period: String,
    value: String,
    area: String,
    project: String,
}

impl Columns {
    fn find(sheet: &Sheet) -> GestaoResult<Self> {
        let names = sheet.column_names();
        let required = |label: &str| {
            find_column(names, label)
                .map(str::to_string)
                .ok_or_else(|| GestaoError::MissingColumn(label.to_string()))
        };
        let period = match detect_period_columns(names).nd {
            Some(column) => column,
            None => required(PERIOD)?,
        };
        Ok(Self {
            period,
            value: required(VALUE)?,
            area: required(AREA)?,
            project: required(PROJECT)?,
        })
    }
}

/// Rows missing any required field are dropped and `Valor` becomes numeric.
fn prepare(mut sheet: Sheet) -> GestaoResult<(Sheet, Columns)> {
    let columns = Columns::find(&sheet)?;
    let required = [
        sheet.column_index_by_name(&columns.period)?,
        sheet.column_index_by_name(&columns.value)?,
        sheet.column_index_by_name(&columns.area)?,
        sheet.column_index_by_name(&columns.project)?,
    ];
    let dropped = sheet.filter_rows(|row| required.iter().all(|&i| !row[i].is_blank()));
    if dropped > 0 {
        tracing::debug!(dropped, "dropped rows with missing chart fields");
    }
    sheet.column_map_by_name(&columns.value, |v| {
        coerce_number(v).map_or(CellValue::Null, CellValue::Float)
    })?;
    Ok((sheet, columns))
}

fn controls(sheet: &Sheet, columns: &Columns) -> GestaoResult<Vec<FilterControl>> {
    Ok(vec![
        FilterControl::period(sheet, PERIOD, &columns.period, PeriodRole::Nd)?,
        FilterControl::plain(sheet, AREA, &columns.area)?,
        FilterControl::plain(sheet, PROJECT, &columns.project)?,
    ])
}

/// Filter controls for the page.
pub fn options(sheet: Sheet) -> GestaoResult<Render<Vec<FilterControl>>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    let (sheet, columns) = prepare(sheet)?;
    Ok(Render::Ready(controls(&sheet, &columns)?))
}

/// Filter, group by (period, area) and build the chart.
pub fn render(
    sheet: Sheet,
    selections: &Selections,
    size: (u32, u32),
) -> GestaoResult<Render<GraficosReport>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    let (mut sheet, columns) = prepare(sheet)?;
    let filters = controls(&sheet, &columns)?;
    apply_controls(&mut sheet, &filters, selections)?;

    let period_idx = sheet.column_index_by_name(&columns.period)?;
    let value_idx = sheet.column_index_by_name(&columns.value)?;
    let area_idx = sheet.column_index_by_name(&columns.area)?;

    // x-axis: labels in time order, then unresolved text
    let periods = period_options(sheet.rows().map(|row| &row[period_idx])).into_strings();
    let areas: BTreeSet<String> = sheet.rows().map(|row| row[area_idx].to_string()).collect();

    let mut sums: HashMap<(String, String), f64> = HashMap::new();
    for row in sheet.rows() {
        let period = format_period(&row[period_idx])
            .map(|label| label.to_string())
            .unwrap_or_else(|| row[period_idx].to_string());
        let value = row[value_idx].as_float().unwrap_or(0.0);
        *sums.entry((period, row[area_idx].to_string())).or_default() += value;
    }

    let mut grouped_rows = Vec::new();
    for period in &periods {
        for area in &areas {
            if let Some(total) = sums.get(&(period.clone(), area.clone())) {
                grouped_rows.push(vec![
                    CellValue::from(period.as_str()),
                    CellValue::from(area.as_str()),
                    CellValue::Float(*total),
                    CellValue::from(format_brl(*total)),
                ]);
            }
        }
    }
    let grouped = Sheet::from_parts(
        "Reclassificações",
        vec![PERIOD.into(), AREA.into(), VALUE.into(), "Texto".into()],
        grouped_rows,
    )?;

    let mut chart = ChartSpec::new(TITLE)
        .with_labels(periods.clone())
        .with_axis_labels(PERIOD, VALUE)
        .with_value_prefix("R$")
        .with_size(size.0, size.1);
    for area in &areas {
        let data = periods
            .iter()
            .map(|period| {
                sums.get(&(period.clone(), area.clone()))
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();
        chart.push_dataset(area.as_str(), data);
    }
    tracing::info!(
        periods = periods.len(),
        areas = areas.len(),
        "built reclassification chart"
    );

    Ok(Render::Ready(GraficosReport {
        filters,
        grouped,
        chart,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controle_nds() -> Sheet {
        Sheet::from_data(vec![
            vec![
                CellValue::from("Período ND"),
                CellValue::from("Área"),
                CellValue::from("Projeto"),
                CellValue::from("Valor"),
            ],
            vec![
                CellValue::from("Set/25"),
                CellValue::from("TI"),
                CellValue::from("P1"),
                CellValue::from("R$ 1.000,50"),
            ],
            vec![
                CellValue::from("Conjunto/25"),
                CellValue::from("TI"),
                CellValue::from("P2"),
                CellValue::Float(500.0),
            ],
            vec![
                CellValue::from("Out/24"),
                CellValue::from("RH"),
                CellValue::from("P1"),
                CellValue::Int(200),
            ],
            vec![
                CellValue::from("Out/24"),
                CellValue::Null,
                CellValue::from("P1"),
                CellValue::Int(999),
            ],
            vec![
                CellValue::from("blah"),
                CellValue::from("RH"),
                CellValue::from("P3"),
                CellValue::Int(1),
            ],
        ])
    }

    fn report(selections: &Selections) -> GraficosReport {
        render(controle_nds(), selections, (1000, 600))
            .unwrap()
            .ready()
            .unwrap()
    }

    #[test]
    fn test_groups_by_period_and_area() {
        let report = report(&Selections::new());
        assert_eq!(
            report.grouped.to_string_grid()[1..],
            [
                vec!["Out/24", "RH", "200", "R$ 200,00"],
                vec!["Set/25", "TI", "1500.5", "R$ 1.500,50"],
                vec!["blah", "RH", "1", "R$ 1,00"],
            ]
        );
    }

    #[test]
    fn test_chart_series_per_area() {
        let chart = report(&Selections::new()).chart;
        assert_eq!(chart.title, TITLE);
        assert_eq!(chart.data.labels, vec!["Out/24", "Set/25", "blah"]);
        let series: Vec<(&str, &[f64])> = chart
            .data
            .datasets
            .iter()
            .map(|d| (d.label.as_str(), d.data.as_slice()))
            .collect();
        assert_eq!(
            series,
            vec![("RH", &[200.0, 0.0, 1.0][..]), ("TI", &[0.0, 1500.5, 0.0][..])]
        );
        assert_eq!(chart.options.value_prefix.as_deref(), Some("R$"));
    }

    #[test]
    fn test_filters_narrow_chart() {
        let selections = Selections::from_pairs([("Projeto", "P1")]);
        let chart = report(&selections).chart;
        assert_eq!(chart.data.labels, vec!["Out/24", "Set/25"]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let sheet = Sheet::from_data(vec![vec!["Período ND", "Área"], vec!["Set/25", "TI"]]);
        assert!(matches!(
            render(sheet, &Selections::new(), (1, 1)),
            Err(GestaoError::MissingColumn(column)) if column == "Valor"
        ));
    }
}
