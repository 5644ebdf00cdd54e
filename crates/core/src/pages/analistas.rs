//! "Analistas": cost recovery per analyst.

use crate::error::GestaoResult;
use crate::selection::Selections;
use crate::table::{apply_controls, drop_sequential_column, numeric_column, FilterControl, Render};
use gestao_formatting::{format_brl, format_integer, Tone};
use gestao_period::find_column;
use gestao_sheet::{CellValue, Sheet};
use serde::Serialize;

/// File name of the detail export.
pub const DETAIL_EXPORT_FILE: &str = "Detalhamento_Analistas.xlsx";

const FILTERS: [&str; 3] = ["Área", "Analista", "Cargo"];

const ANALYST: &str = "Analista";
const HOURS: &str = "Horas Base";
const COST: &str = "Custo Mensal GS";
const RECOVERED: &str = "Valor Recobrado";
const CAPITALIZED: &str = "Valor Capitalizado";
const BALANCE: &str = "Saldo";
const INACTIVE_FLAG: &str = "Ativo";

/// Money columns of the detail table.
const DETAIL_CURRENCY: [&str; 4] = [COST, RECOVERED, CAPITALIZED, "Valor Hora"];

/// Eleven months of hours and capitalization, twelve of cost and recovery.
const YEARLY_MULTIPLIERS: Multipliers = Multipliers {
    hours: 11.0,
    cost: 12.0,
    recovered: 12.0,
    capitalized: 11.0,
};

const MONTHLY_MULTIPLIERS: Multipliers = Multipliers {
    hours: 1.0,
    cost: 1.0,
    recovered: 1.0,
    capitalized: 1.0,
};

#[derive(Debug, Clone, Copy)]
struct Multipliers {
    hours: f64,
    cost: f64,
    recovered: f64,
    capitalized: f64,
}

/// One cost analysis table, total row first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTable {
    pub title: String,
    /// Export name derived from the title
    pub file_name: String,
    pub table: Sheet,
    /// Tone of the `Saldo` cell of each row
    pub balance_tones: Vec<Tone>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalistasReport {
    pub filters: Vec<FilterControl>,
    pub yearly: CostTable,
    pub monthly: CostTable,
    pub detail: Sheet,
}

fn controls(sheet: &Sheet) -> GestaoResult<Vec<FilterControl>> {
    let names = sheet.column_names();
    let mut controls = Vec::new();
    for label in FILTERS {
        if let Some(column) = find_column(names, label) {
            controls.push(FilterControl::plain(sheet, label, column)?);
        }
    }
    Ok(controls)
}

/// Filter controls for the page.
pub fn options(mut sheet: Sheet) -> GestaoResult<Render<Vec<FilterControl>>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    drop_sequential_column(&mut sheet);
    Ok(Render::Ready(controls(&sheet)?))
}

/// Filter the sheet and build the cost tables and the detail table.
pub fn render(mut sheet: Sheet, selections: &Selections) -> GestaoResult<Render<AnalistasReport>> {
    if sheet.is_empty() {
        return Ok(Render::no_data());
    }
    drop_sequential_column(&mut sheet);
    let filters = controls(&sheet)?;
    apply_controls(&mut sheet, &filters, selections)?;
    tracing::info!(rows = sheet.row_count(), "filtered analysts");

    let yearly = cost_table(&sheet, "Análise Custos (Ano)", YEARLY_MULTIPLIERS)?;
    let monthly = cost_table(&sheet, "Análise Custos Analistas (Mês)", MONTHLY_MULTIPLIERS)?;
    let detail = detail_table(sheet)?;

    Ok(Render::Ready(AnalistasReport {
        filters,
        yearly,
        monthly,
        detail,
    }))
}

fn analyst_names(sheet: &Sheet) -> Vec<String> {
    match find_column(sheet.column_names(), ANALYST) {
        Some(column) => sheet
            .column_by_name(column)
            .map(|values| values.iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        None => vec![String::new(); sheet.row_count()],
    }
}

fn scaled(sheet: &Sheet, label: &str, factor: f64) -> Vec<f64> {
    numeric_column(sheet, find_column(sheet.column_names(), label))
        .into_iter()
        .map(|v| v * factor)
        .collect()
}

fn total(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn cost_table(sheet: &Sheet, title: &str, multipliers: Multipliers) -> GestaoResult<CostTable> {
    let names = analyst_names(sheet);
    let hours = scaled(sheet, HOURS, multipliers.hours);
    let cost = scaled(sheet, COST, multipliers.cost);
    let recovered = scaled(sheet, RECOVERED, multipliers.recovered);
    let capitalized = scaled(sheet, CAPITALIZED, multipliers.capitalized);

    let balance: Vec<f64> = (0..sheet.row_count())
        .map(|i| cost[i] - recovered[i] - capitalized[i])
        .collect();

    let mut figures = vec![(
        format!("Total ({})", sheet.row_count()),
        [
            total(&hours),
            total(&cost),
            total(&recovered),
            total(&capitalized),
            total(&balance),
        ],
    )];
    figures.extend((0..sheet.row_count()).map(|i| {
        (
            names[i].clone(),
            [hours[i], cost[i], recovered[i], capitalized[i], balance[i]],
        )
    }));

    let balance_tones = figures.iter().map(|(_, f)| Tone::for_balance(f[4])).collect();
    let rows = figures
        .into_iter()
        .map(|(name, [h, c, r, k, s])| {
            vec![
                CellValue::from(name),
                CellValue::from(format_integer(h)),
                CellValue::from(format_brl(c)),
                CellValue::from(format_brl(r)),
                CellValue::from(format_brl(k)),
                CellValue::from(format_brl(s)),
            ]
        })
        .collect();

    let columns = [ANALYST, HOURS, COST, RECOVERED, CAPITALIZED, BALANCE]
        .iter()
        .map(|c| c.to_string())
        .collect();

    Ok(CostTable {
        title: title.to_string(),
        file_name: format!("{}.xlsx", title.replace(' ', "_")),
        table: Sheet::from_parts(title, columns, rows)?,
        balance_tones,
    })
}

/// Filtered rows without `Ativo`, figures formatted, total row first.
fn detail_table(mut sheet: Sheet) -> GestaoResult<Sheet> {
    sheet.remove_columns(&[INACTIVE_FLAG]);
    sheet.set_name("Detalhamento dos Analistas");
    if sheet.is_empty() {
        return Ok(sheet);
    }

    let mut total_row = vec![CellValue::from(""); sheet.col_count()];
    if let Ok(idx) = sheet.column_index_by_name(ANALYST) {
        total_row[idx] = CellValue::from(format!("Total ({})", sheet.row_count()));
    }

    if sheet.has_column(HOURS) {
        let hours: Vec<f64> = numeric_column(&sheet, Some(HOURS))
            .into_iter()
            .map(f64::trunc)
            .collect();
        total_row[sheet.column_index_by_name(HOURS)?] =
            CellValue::from(format_integer(total(&hours)));
        let mut formatted = hours.into_iter().map(format_integer);
        sheet.column_map_by_name(HOURS, |_| {
            CellValue::from(formatted.next().unwrap_or_default())
        })?;
    }

    for column in DETAIL_CURRENCY {
        if !sheet.has_column(column) {
            continue;
        }
        let values = numeric_column(&sheet, Some(column));
        total_row[sheet.column_index_by_name(column)?] =
            CellValue::from(format_brl(total(&values)));
        let mut formatted = values.into_iter().map(format_brl);
        sheet.column_map_by_name(column, |_| {
            CellValue::from(formatted.next().unwrap_or_default())
        })?;
    }

    sheet.row_insert(0, total_row)?;
    Ok(sheet)
}
