//! CSV import
//!
//! Reads CSV rows (header row required) into field/value pairs ready to be
//! appended to a record collection. Values stay text unless a schema is given,
//! in which case known fields are coerced to their schema type.

use std::io::Read;

use crate::error::{AssistantError, AssistantResult};
use crate::models::{EntityKind, FieldValue, Record, RecordId, ID_FIELD};

/// A parsed CSV row before it receives its final id
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRow {
    /// Id from the `id` column, when present and a positive integer
    pub id: Option<RecordId>,
    pub fields: Vec<(String, FieldValue)>,
}

impl ImportedRow {
    /// Build the record under the given id
    pub fn into_record(self, id: RecordId) -> Record {
        self.fields
            .into_iter()
            .fold(Record::new(id), |record, (key, value)| record.with(key, value))
    }
}

/// Convert one raw value, applying the schema type when one is known
fn convert_value(schema: Option<EntityKind>, key: &str, raw: &str) -> FieldValue {
    schema
        .and_then(|kind| kind.field_type(key))
        .and_then(|field_type| field_type.coerce(raw))
        .unwrap_or_else(|| FieldValue::Text(raw.to_string()))
}

/// Read all data rows from a CSV source
///
/// Every row must have as many columns as the header.
pub fn read_csv_rows<R: Read>(
    reader: R,
    delimiter: u8,
    schema: Option<EntityKind>,
) -> AssistantResult<Vec<ImportedRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AssistantError::Import(format!("Failed to read CSV header: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result
            .map_err(|e| AssistantError::Import(format!("Row {}: {}", idx + 1, e)))?;

        let mut id = None;
        let mut fields = Vec::with_capacity(record.len());
        for (key, raw) in headers.iter().zip(record.iter()) {
            if key == ID_FIELD {
                id = raw.trim().parse::<RecordId>().ok().filter(|&n| n > 0);
            } else {
                fields.push((key.to_string(), convert_value(schema, key, raw)));
            }
        }
        rows.push(ImportedRow { id, fields });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_stay_text_without_schema() {
        let data = "id,amount,category,date,description\n1,-20.5,Food,01-02-2024,Lunch\n";
        let rows = read_csv_rows(data.as_bytes(), b',', None).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, Some(1));
        assert_eq!(rows[0].fields[0], ("amount".into(), FieldValue::Text("-20.5".into())));
    }

    #[test]
    fn test_schema_coercion() {
        let data = "id,title,description,priority,due_date,done\n\
                    3,Call,Bank,High,01-02-2024,True\n\
                    4,Write,Report,Low,01-02-2024,sometimes\n";
        let rows = read_csv_rows(data.as_bytes(), b',', Some(EntityKind::Tasks)).unwrap();

        let done: Vec<_> = rows
            .iter()
            .map(|r| r.fields.iter().find(|(k, _)| k == "done").unwrap().1.clone())
            .collect();
        assert_eq!(done[0], FieldValue::Bool(true));
        assert_eq!(done[1], FieldValue::Text("sometimes".into()));
    }

    #[test]
    fn test_bad_or_missing_id() {
        let data = "id,name\nabc,Ann\n0,Bo\n";
        let rows = read_csv_rows(data.as_bytes(), b',', None).unwrap();
        assert!(rows.iter().all(|r| r.id.is_none()));

        let data = "name\nAnn\n";
        let rows = read_csv_rows(data.as_bytes(), b',', None).unwrap();
        assert_eq!(rows[0].id, None);
        assert_eq!(rows[0].clone().into_record(5).text("name"), "Ann");
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let data = "id,name\n1,Ann,extra\n";
        let err = read_csv_rows(data.as_bytes(), b',', None).unwrap_err();
        assert!(matches!(err, AssistantError::Import(_)));
    }

    #[test]
    fn test_header_only_file() {
        let rows = read_csv_rows("id,name\n".as_bytes(), b',', None).unwrap();
        assert!(rows.is_empty());
    }
}
