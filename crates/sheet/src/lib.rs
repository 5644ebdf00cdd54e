//! Record tables for gestao
//!
//! A [`Sheet`] is one worksheet of the management workbook: a header row of
//! column names followed by data rows of [`CellValue`]s. Sheets are loaded
//! fresh from xlsx for every render and can be written back out as xlsx,
//! CSV, JSON records or an Arrow batch for terminal display.
//!
//! # Examples
//!
//! ```
//! use gestao_sheet::{CellValue, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["Área", "Valor"],
//!     vec!["TI", "10"],
//!     vec!["RH", "20"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.get_by_name(0, "Área").unwrap(), &CellValue::from("TI"));
//! ```
//!
//! ```no_run
//! use gestao_sheet::Sheet;
//!
//! let sheet = Sheet::from_xlsx_sheet("APP Gestão.xlsx", "Controle NDs").unwrap();
//! let bytes = sheet.to_xlsx_bytes().unwrap();
//! ```

mod batch;
mod cell;
mod csv;
mod datetime;
mod error;
mod json;
mod sheet;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export serial date helpers.
pub use datetime::{datetime_to_excel_serial, excel_serial_to_datetime};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
