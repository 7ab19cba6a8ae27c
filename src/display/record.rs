//! Record display formatting
//!
//! Formats records of any collection as a table (columns taken from the
//! collection's schema) or as a detail view listing every stored field.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::{EntityKind, FieldValue, Record};

/// Longest cell shown in list view before truncation
const MAX_CELL_WIDTH: usize = 40;

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(true) => "Yes".to_string(),
        FieldValue::Bool(false) => "No".to_string(),
        FieldValue::Float(f) => format!("{:.2}", f),
        other => other.to_string(),
    }
}

/// Format records as a table with one column per schema field
pub fn format_record_list(kind: EntityKind, records: &[&Record]) -> String {
    if records.is_empty() {
        return format!("No {} found.", kind.name());
    }

    let schema = kind.schema();
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("ID".to_string()).chain(schema.iter().map(|f| f.label.to_string())),
    );

    for record in records {
        let cells = schema.iter().map(|field| {
            record
                .get(field.name)
                .map(|v| truncate(&format_value(v), MAX_CELL_WIDTH))
                .unwrap_or_default()
        });
        builder.push_record(std::iter::once(record.id().to_string()).chain(cells));
    }

    let mut table = builder.build();
    table.with(Style::psql());

    format!("{}\n{} {}", table, records.len(), kind.name())
}

/// Format one record with every stored field
pub fn format_record_details(kind: EntityKind, record: &Record) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} #{}\n", kind.singular(), record.id()));

    let labelled: Vec<(String, String)> = record
        .fields()
        .map(|(key, value)| {
            let label = kind
                .schema()
                .iter()
                .find(|f| f.name == key)
                .map(|f| f.label.to_string())
                .unwrap_or_else(|| key.to_string());
            (label, format_value(value))
        })
        .collect();

    let width = labelled.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, value) in labelled {
        output.push_str(&format!(
            "  {:<width$}  {}\n",
            format!("{}:", label),
            value,
            width = width + 1
        ));
    }

    output
}
