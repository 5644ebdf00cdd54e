//! Period columns for gestao
//!
//! The management workbook records several calendar periods per row (the
//! debit note period, the allocation period and the closing period) but
//! neither the column names nor the cell values are consistent. This crate
//! finds those columns, turns each cell into a canonical `Mon/YY`
//! [`PeriodLabel`] and builds chronologically ordered filter choices.
//!
//! Conversion never fails: a cell either resolves to a label or lands in an
//! "unresolved" bucket that is still offered as a filter choice.
//!
//! # Examples
//!
//! ```
//! use gestao_period::{detect_period_columns, ordered_options, FilterSet};
//! use gestao_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Período ND", "Área"],
//!     vec!["Set/25", "TI"],
//!     vec!["Conjunto/25", "RH"],
//!     vec!["Out/24", "TI"],
//! ]);
//!
//! let roles = detect_period_columns(sheet.column_names());
//! let nd = roles.nd.clone().unwrap();
//!
//! let values = sheet.column_by_name(&nd).unwrap();
//! assert_eq!(ordered_options(&values), vec!["Out/24", "Set/25"]);
//!
//! let mut filters = FilterSet::new();
//! filters.add_period(&nd, ["Set/25"]);
//! filters.apply(&mut sheet).unwrap();
//! assert_eq!(sheet.row_count(), 2);
//! ```

mod columns;
mod convert;
mod filter;
mod label;
mod normalize;
mod options;

pub use columns::{
    detect_period_columns, find_column, find_column_by_keywords, PeriodColumns, PeriodRole,
};
pub use convert::{format_period, period_display};
pub use filter::FilterSet;
pub use label::{ParseLabelError, PeriodLabel, MONTH_ABBREVIATIONS};
pub use normalize::{normalize_name, strip_diacritics};
pub use options::{distinct_options, ordered_options, period_options, PeriodOptions};
