use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use serde::ser::{Serialize, SerializeStruct, Serializer};

impl Sheet {
    /// Serialize rows as a JSON array of objects keyed by column name
    pub fn to_json_records(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self.to_records()).map_err(|e| SheetError::Serialize(e.to_string()))
    }

    /// Pretty-printed JSON array of records
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_records())
            .map_err(|e| SheetError::Serialize(e.to_string()))
    }
}

/// Serializes as `{ "name", "columns", "rows" }` with rows as records, so
/// empty sheets still carry their header.
impl Serialize for Sheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sheet", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("columns", self.column_names())?;
        state.serialize_field("rows", &self.to_records())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    #[test]
    fn test_records_keep_column_order_and_types() {
        let sheet = Sheet::from_parts(
            "x",
            vec!["Conta Contábil".into(), "Valor".into(), "Obs".into()],
            vec![vec![CellValue::from("4100"), CellValue::Float(12.5), CellValue::Null]],
        )
        .unwrap();

        let json = sheet.to_json_records().unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "Conta Contábil": "4100", "Valor": 12.5, "Obs": null }])
        );

        let text = sheet.to_json_string().unwrap();
        assert!(text.find("Conta Contábil").unwrap() < text.find("Valor").unwrap());
    }

    #[test]
    fn test_serialize_keeps_header_of_empty_sheet() {
        let sheet = Sheet::from_parts("Totais", vec!["Conta Contábil".into()], vec![]).unwrap();
        let json = serde_json::to_value(&sheet).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Totais", "columns": ["Conta Contábil"], "rows": [] })
        );
    }
}
