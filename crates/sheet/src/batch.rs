use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

impl Sheet {
    /// Convert to an Arrow batch with one nullable Utf8 column per sheet
    /// column. Null cells stay null; everything else is rendered as text.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .column_names()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let arrays: Vec<ArrayRef> = (0..self.col_count())
            .map(|col_idx| {
                let values: StringArray = self
                    .rows()
                    .map(|row| {
                        let cell = &row[col_idx];
                        (!cell.is_null()).then(|| cell.as_str())
                    })
                    .collect();
                Arc::new(values) as ArrayRef
            })
            .collect();

        RecordBatch::try_new(schema, arrays).map_err(|e| SheetError::Serialize(e.to_string()))
    }
}
