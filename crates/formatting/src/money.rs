use crate::number::format_decimal;
use gestao_sheet::CellValue;

/// Brazilian currency: `R$ 1.234,56`. Negative amounts keep the sign after
/// the symbol (`R$ -10,00`), the way the workbook's own exports print them.
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal(value, 2))
}

/// Parse a pt-BR money string such as `"R$ 1.234,56"`.
///
/// `.` is read as a thousands separator and `,` as the decimal mark.
pub fn parse_money(text: &str) -> Option<f64> {
    let cleaned = text.replace("R$", "").replace('.', "").replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric value of a cell, or `None` when it holds no number.
///
/// Text is tried as a plain number first (`"1500.5"`) and then as a money
/// string (`"R$ 1.500,50"`).
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Int(i) => Some(*i as f64),
        CellValue::Float(f) if f.is_finite() => Some(*f),
        CellValue::String(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .or_else(|| parse_money(trimmed))
        }
        CellValue::Float(_) | CellValue::Null | CellValue::Bool(_) | CellValue::Date(_) => None,
    }
}
