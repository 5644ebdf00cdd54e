use crate::error::Result;
use crate::sheet::Sheet;
use std::io::Write;

/// CSV writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Whether to write the header row
    pub has_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            has_headers: true,
        }
    }
}

impl CsvOptions {
    /// Semicolon-separated output, the spreadsheet default in pt-BR locales
    #[must_use]
    pub fn semicolon() -> Self {
        CsvOptions {
            delimiter: b';',
            ..Default::default()
        }
    }

    /// Set whether the header row is written
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }
}

impl Sheet {
    /// Write the sheet as CSV to any writer
    pub fn write_csv<W: Write>(&self, writer: W, options: &CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .from_writer(writer);

        if options.has_headers {
            csv_writer.write_record(self.column_names())?;
        }
        for row in self.rows() {
            csv_writer.write_record(row.iter().map(|cell| cell.as_str()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the sheet as a CSV string
    #[must_use]
    pub fn to_csv_string(&self) -> String {
        self.to_csv_string_with_options(&CsvOptions::default())
    }

    /// Render the sheet as a CSV string with options
    #[must_use]
    pub fn to_csv_string_with_options(&self, options: &CsvOptions) -> String {
        let mut buffer = Vec::new();
        if self.write_csv(&mut buffer, options).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_output() {
        let sheet = Sheet::from_data(vec![vec!["Conta", "Total"], vec!["4100", "R$ 1,00"]]);
        assert_eq!(sheet.to_csv_string(), "Conta,Total\n4100,\"R$ 1,00\"\n");
    }

    #[test]
    fn test_semicolon_without_header() {
        let sheet = Sheet::from_data(vec![vec!["a", "b"], vec!["1", "2"]]);
        let out = sheet.to_csv_string_with_options(&CsvOptions::semicolon().with_headers(false));
        assert_eq!(out, "1;2\n");
    }
}
