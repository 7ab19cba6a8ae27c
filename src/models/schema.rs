//! Entity schemas
//!
//! One schema per record kind, describing field names and their expected
//! types. The store never looks at these; they drive display and the optional
//! coercion applied to CSV imports.

use std::fmt;

use super::record::FieldValue;
use crate::validation::validate_date;

/// Expected type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Bool,
    /// Text in `DD-MM-YYYY` form
    Date,
    /// Text in `DD-MM-YYYY HH:MM:SS` form
    DateTime,
}

impl FieldType {
    /// Convert raw CSV text into a value of this type
    ///
    /// Returns `None` when the text does not fit; callers keep the raw string
    /// in that case.
    pub fn coerce(self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Text => Some(FieldValue::Text(raw.to_string())),
            Self::Integer => raw.trim().parse::<i64>().ok().map(FieldValue::Integer),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(FieldValue::Float),
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(FieldValue::Bool(true)),
                "false" | "0" => Some(FieldValue::Bool(false)),
                _ => None,
            },
            Self::Date => validate_date(raw, false).then(|| FieldValue::Text(raw.to_string())),
            Self::DateTime => validate_date(raw, true).then(|| FieldValue::Text(raw.to_string())),
        }
    }
}

/// A single field in a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Column heading for display
    pub label: &'static str,
}

const fn field(name: &'static str, field_type: FieldType, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        label,
    }
}

const NOTE_FIELDS: &[FieldSpec] = &[
    field("title", FieldType::Text, "Title"),
    field("content", FieldType::Text, "Content"),
    field("timestamp", FieldType::DateTime, "Date"),
];

const TASK_FIELDS: &[FieldSpec] = &[
    field("title", FieldType::Text, "Title"),
    field("description", FieldType::Text, "Description"),
    field("priority", FieldType::Text, "Priority"),
    field("due_date", FieldType::Date, "Due"),
    field("done", FieldType::Bool, "Done"),
];

const CONTACT_FIELDS: &[FieldSpec] = &[
    field("name", FieldType::Text, "Name"),
    field("phone", FieldType::Text, "Phone"),
    field("email", FieldType::Text, "Email"),
];

const FINANCE_FIELDS: &[FieldSpec] = &[
    field("amount", FieldType::Float, "Amount"),
    field("category", FieldType::Text, "Category"),
    field("date", FieldType::Date, "Date"),
    field("description", FieldType::Text, "Description"),
];

/// The four record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Notes,
    Tasks,
    Contacts,
    Finance,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Notes, Self::Tasks, Self::Contacts, Self::Finance];

    /// Collection name, used in messages and the audit log
    pub fn name(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Tasks => "tasks",
            Self::Contacts => "contacts",
            Self::Finance => "finance",
        }
    }

    /// Human-readable name of one record
    pub fn singular(self) -> &'static str {
        match self {
            Self::Notes => "Note",
            Self::Tasks => "Task",
            Self::Contacts => "Contact",
            Self::Finance => "Finance entry",
        }
    }

    /// Storage file name inside the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Notes => "notes.json",
            Self::Tasks => "tasks.json",
            Self::Contacts => "contacts.json",
            Self::Finance => "finance.json",
        }
    }

    pub fn schema(self) -> &'static [FieldSpec] {
        match self {
            Self::Notes => NOTE_FIELDS,
            Self::Tasks => TASK_FIELDS,
            Self::Contacts => CONTACT_FIELDS,
            Self::Finance => FINANCE_FIELDS,
        }
    }

    /// Look up the expected type of a field
    pub fn field_type(self, name: &str) -> Option<FieldType> {
        self.schema()
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.field_type)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
