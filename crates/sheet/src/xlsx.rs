use crate::cell::CellValue;
use crate::datetime::{datetime_to_excel_serial, excel_serial_to_datetime};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError as WriteError};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn read_error(e: XlsxError) -> SheetError {
    SheetError::Xlsx(e.to_string())
}

fn write_error(e: WriteError) -> SheetError {
    SheetError::Xlsx(e.to_string())
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map_or(CellValue::Float(dt.as_f64()), CellValue::Date),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map_or_else(|| CellValue::String(s.clone()), CellValue::Date),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}

/// Turn a raw header row into unique column names. Blank headers become
/// `Unnamed: <index>` and repeated names get a `.1`, `.2`, ... suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let raw = data_to_cell_value(cell).as_str().trim().to_string();
            let base = if raw.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                raw
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

impl Sheet {
    /// Load a named sheet from an Excel file. The first row of the used
    /// range becomes the column names.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::FileNotFound` if the file does not exist,
    /// `SheetError::SheetNotFound` if it has no sheet with that name, and
    /// `SheetError::Xlsx` if the workbook cannot be read.
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let mut workbook: Xlsx<BufReader<File>> = open_workbook(path).map_err(read_error)?;

        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(SheetError::SheetNotFound {
                name: sheet_name.to_string(),
                path: path.display().to_string(),
            });
        }

        let range = workbook.worksheet_range(sheet_name).map_err(read_error)?;
        let mut rows = range.rows();

        let Some(header) = rows.next() else {
            tracing::debug!(sheet = sheet_name, "sheet has no used range");
            return Ok(Sheet::with_name(sheet_name));
        };
        let columns = header_names(header);

        let data: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        tracing::debug!(
            sheet = sheet_name,
            rows = data.len(),
            cols = columns.len(),
            "loaded xlsx sheet"
        );
        Sheet::from_parts(sheet_name, columns, data)
    }

    /// Sheet names of an Excel file, in workbook order
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or cannot be opened.
    pub fn xlsx_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let workbook: Xlsx<BufReader<File>> = open_workbook(path).map_err(read_error)?;
        Ok(workbook.sheet_names())
    }

    /// Save the sheet to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref()).map_err(write_error)
    }

    /// Serialize the sheet into an in-memory xlsx file
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        workbook.save_to_buffer().map_err(write_error)
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_to_worksheet(worksheet)?;
        Ok(workbook)
    }

    /// Write header and data to a worksheet
    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        // Worksheet names are limited to 31 characters.
        let title: String = self.name().chars().take(31).collect();
        worksheet.set_name(&title).map_err(write_error)?;

        let bold = Format::new().set_bold();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");

        for (col_idx, name) in self.column_names().iter().enumerate() {
            let col_num = column_number(col_idx)?;
            worksheet
                .write_string_with_format(0, col_num, name, &bold)
                .map_err(write_error)?;
        }

        for (row_idx, row) in self.rows().enumerate() {
            let row_num = u32::try_from(row_idx + 1)
                .map_err(|_| SheetError::Xlsx("Row index overflow".to_string()))?;

            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = column_number(col_idx)?;

                match cell {
                    CellValue::Null => {}
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(write_error)?;
                    }
                    CellValue::Int(i) => {
                        // Excel stores all numbers as f64
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(write_error)?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(write_error)?;
                    }
                    CellValue::Date(dt) => {
                        worksheet
                            .write_number_with_format(
                                row_num,
                                col_num,
                                datetime_to_excel_serial(*dt),
                                &date_format,
                            )
                            .map_err(write_error)?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(write_error)?;
                    }
                }
            }
        }

        worksheet.autofit();
        Ok(())
    }
}

fn column_number(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| SheetError::Xlsx("Column index overflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_xlsx_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.xlsx");

        let mut sheet = Sheet::from_data(vec![
            vec!["Analista", "Horas", "Ativo"],
            vec!["Alice", "30", "sim"],
            vec!["Bob", "25", "não"],
        ]);
        sheet.set_name("Analistas");
        sheet.save_as_xlsx(&path).unwrap();

        let loaded = Sheet::from_xlsx_sheet(&path, "Analistas").unwrap();
        assert_eq!(loaded.column_names(), &["Analista", "Horas", "Ativo"]);
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.get_by_name(1, "Analista").unwrap().as_str(), "Bob");
    }

    #[test]
    fn test_xlsx_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.xlsx");

        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let sheet = Sheet::from_parts(
            "Tipos",
            vec!["texto".into(), "numero".into(), "flag".into(), "data".into()],
            vec![vec![
                CellValue::from("abc"),
                CellValue::Float(3.5),
                CellValue::Bool(true),
                CellValue::from(date),
            ]],
        )
        .unwrap();
        sheet.save_as_xlsx(&path).unwrap();

        let loaded = Sheet::from_xlsx_sheet(&path, "Tipos").unwrap();
        assert!(matches!(loaded.get(0, 0).unwrap(), CellValue::String(s) if s == "abc"));
        assert!(matches!(loaded.get(0, 1).unwrap(), CellValue::Float(f) if (*f - 3.5).abs() < 1e-9));
        assert!(matches!(loaded.get(0, 2).unwrap(), CellValue::Bool(true)));
        assert_eq!(loaded.get(0, 3).unwrap().as_date(), Some(date));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = Sheet::from_xlsx_sheet(dir.path().join("nope.xlsx"), "Controle NDs").unwrap_err();
        assert!(matches!(err, SheetError::FileNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_sheet_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut sheet = Sheet::from_data(vec![vec!["a"], vec!["1"]]);
        sheet.set_name("Outra");
        sheet.save_as_xlsx(&path).unwrap();

        let err = Sheet::from_xlsx_sheet(&path, "Controle NDs").unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound { ref name, .. } if name == "Controle NDs"));
    }

    #[test]
    fn test_header_names_dedupe_and_blank() {
        let header = vec![
            Data::Empty,
            Data::String("Valor".to_string()),
            Data::String("Valor".to_string()),
        ];
        assert_eq!(header_names(&header), vec!["Unnamed: 0", "Valor", "Valor.1"]);
    }

    #[test]
    fn test_bytes_are_a_zip_container() {
        let sheet = Sheet::from_data(vec![vec!["a"], vec!["1"]]);
        let bytes = sheet.to_xlsx_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
