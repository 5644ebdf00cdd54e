use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use indexmap::IndexMap;

/// A named table: a header of column names plus row-major data rows.
///
/// Every row has exactly `col_count()` cells; constructors pad short rows
/// with `CellValue::Null` and reject long ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values. The first row names the
    /// columns; the remaining rows are data.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let mut iter = data.into_iter();
        let columns: Vec<String> = iter
            .next()
            .map(|header| header.into_iter().map(|c| c.into().as_str()).collect())
            .unwrap_or_default();
        let width = columns.len();

        let rows = iter
            .map(|row| {
                let mut cells: Vec<CellValue> = row.into_iter().map(Into::into).collect();
                cells.resize(width, CellValue::Null);
                cells
            })
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            columns,
            rows,
        }
    }

    /// Create a sheet from explicit column names and rows.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if a row is longer than the header.
    pub fn from_parts(
        name: &str,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());
        for mut row in rows {
            if row.len() > width {
                return Err(SheetError::LengthMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            row.resize(width, CellValue::Null);
            padded.push(row);
        }

        Ok(Sheet {
            name: name.to_string(),
            columns,
            rows: padded,
        })
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of data rows (the header is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Whether a column with exactly this name exists
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Get the column index by name
    pub fn column_index_by_name(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        let cells = self.row(row)?;
        cells.get(col).ok_or(SheetError::ColumnIndexOutOfBounds {
            index: col,
            count: self.col_count(),
        })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_index_by_name(col_name)?;
        self.get(row, col)
    }

    // ===== Row Operations =====

    /// Get a row by index
    pub fn row(&self, index: usize) -> Result<&[CellValue]> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(SheetError::RowIndexOutOfBounds {
                index,
                count: self.rows.len(),
            })
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Insert a row at the given index
    pub fn row_insert<T: Into<CellValue>>(&mut self, index: usize, data: Vec<T>) -> Result<()> {
        if index > self.rows.len() {
            return Err(SheetError::RowIndexOutOfBounds {
                index,
                count: self.rows.len(),
            });
        }
        let row = self.checked_row(data)?;
        self.rows.insert(index, row);
        Ok(())
    }

    /// Keep only the rows for which the predicate returns true.
    /// Returns the number of rows removed.
    pub fn filter_rows<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| predicate(row));
        before - self.rows.len()
    }

    fn checked_row<T: Into<CellValue>>(&self, data: Vec<T>) -> Result<Vec<CellValue>> {
        if data.len() != self.columns.len() {
            return Err(SheetError::LengthMismatch {
                expected: self.columns.len(),
                actual: data.len(),
            });
        }
        Ok(data.into_iter().map(Into::into).collect())
    }

    // ===== Column Operations =====

    /// Get a column by index
    pub fn column(&self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.columns.len() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.columns.len(),
            });
        }
        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }

    /// Get a column by name
    pub fn column_by_name(&self, name: &str) -> Result<Vec<CellValue>> {
        let index = self.column_index_by_name(name)?;
        self.column(index)
    }

    /// Delete a column by index, returning its values
    pub fn column_delete(&mut self, index: usize) -> Result<Vec<CellValue>> {
        if index >= self.columns.len() {
            return Err(SheetError::ColumnIndexOutOfBounds {
                index,
                count: self.columns.len(),
            });
        }
        self.columns.remove(index);
        Ok(self.rows.iter_mut().map(|row| row.remove(index)).collect())
    }

    /// Remove the named columns that exist; names not present are ignored.
    /// Returns the number of columns removed.
    pub fn remove_columns(&mut self, names: &[&str]) -> usize {
        let mut removed = 0;
        for name in names {
            if let Ok(index) = self.column_index_by_name(name) {
                self.columns.remove(index);
                for row in &mut self.rows {
                    row.remove(index);
                }
                removed += 1;
            }
        }
        removed
    }

    /// Build a new sheet containing only the given columns, in the given order
    pub fn select_columns(&self, names: &[&str]) -> Result<Sheet> {
        let indices = names
            .iter()
            .map(|name| self.column_index_by_name(name))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Sheet {
            name: self.name.clone(),
            columns: names.iter().map(|n| (*n).to_string()).collect(),
            rows,
        })
    }

    /// Apply a function to every cell of a column
    pub fn column_map_by_name<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(&CellValue) -> CellValue,
    {
        let index = self.column_index_by_name(name)?;
        for row in &mut self.rows {
            row[index] = f(&row[index]);
        }
        Ok(())
    }

    // ===== Conversion =====

    /// Convert to a list of records, one `IndexMap` per row in column order
    #[must_use]
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Header plus data rows, all rendered as strings
    #[must_use]
    pub fn to_string_grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.columns.clone())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(CellValue::as_str).collect()),
            )
            .collect()
    }
}
