//! CSV export
//!
//! Writes a record collection as CSV with a header row taken from the first
//! record's keys.

use std::io::Write;

use crate::error::{AssistantError, AssistantResult};
use crate::models::{Record, ID_FIELD};

/// Header row for a collection: the first record's keys, `id` first
pub fn header_for(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Check that every record has exactly the header's fields
///
/// Rows with extra or missing fields would otherwise be written misaligned.
pub fn check_uniform(records: &[Record], header: &[String]) -> AssistantResult<()> {
    for record in records {
        let same_len = record.field_count() == header.len();
        let all_present = header
            .iter()
            .all(|key| key == ID_FIELD || record.get(key).is_some());

        if !(same_len && all_present) {
            let keys: Vec<_> = record.keys().collect();
            return Err(AssistantError::Export(format!(
                "record {} has fields [{}], expected [{}]",
                record.id(),
                keys.join(", "),
                header.join(", ")
            )));
        }
    }
    Ok(())
}

/// Write records as CSV, returning the number of data rows written
///
/// Nothing at all is written for an empty collection.
pub fn export_records_csv<W: Write>(
    records: &[Record],
    writer: W,
    delimiter: u8,
) -> AssistantResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let header = header_for(records);
    check_uniform(records, &header)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(&header)?;
    for record in records {
        let row = header.iter().map(|key| {
            if key == ID_FIELD {
                record.id().to_string()
            } else {
                record.text(key)
            }
        });
        csv_writer.write_record(row)?;
    }

    csv_writer
        .flush()
        .map_err(|e| AssistantError::Export(e.to_string()))?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, name: &str) -> Record {
        Record::new(id)
            .with("name", name)
            .with("phone", "0123456789")
            .with("email", "x@example.com")
    }

    fn export_to_string(records: &[Record]) -> AssistantResult<String> {
        let mut out = Vec::new();
        export_records_csv(records, &mut out, b',')?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_header_and_rows() {
        let csv = export_to_string(&[contact(1, "Ann"), contact(2, "Lee, Bo")]).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "id,name,phone,email");
        assert_eq!(lines[1], "1,Ann,0123456789,x@example.com");
        assert_eq!(lines[2], "2,\"Lee, Bo\",0123456789,x@example.com");
    }

    #[test]
    fn test_values_are_stringified() {
        let task = Record::new(1).with("done", true).with("amount", 12.5);
        let csv = export_to_string(&[task]).unwrap();
        assert!(csv.contains("1,true,12.5"));
    }

    #[test]
    fn test_empty_collection_writes_nothing() {
        assert_eq!(export_to_string(&[]).unwrap(), "");
    }

    #[test]
    fn test_non_uniform_records_rejected() {
        let odd = Record::new(2).with("name", "Bo");
        let err = export_to_string(&[contact(1, "Ann"), odd]).unwrap_err();
        assert!(matches!(err, AssistantError::Export(_)));
    }

    #[test]
    fn test_custom_delimiter() {
        let mut out = Vec::new();
        export_records_csv(&[contact(1, "Ann")], &mut out, b';').unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("id;name;phone;email"));
    }
}
