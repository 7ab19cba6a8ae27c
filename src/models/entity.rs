//! Typed entities
//!
//! Notes, tasks, contacts and finance entries as the command layer builds
//! them. Each converts into a generic [`Record`] before reaching the store.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use super::record::{Record, RecordId};
use super::schema::EntityKind;
use crate::validation::{parse_date, DATETIME_FORMAT};

/// A value that can be stored in a record collection
pub trait Entity {
    /// The collection this entity belongs to
    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    /// Convert into the generic record shape, fields in schema order
    fn to_record(&self) -> Record;
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority '{}' (expected High, Medium or Low)", other)),
        }
    }
}

/// Current local time in note timestamp format
pub fn now_timestamp() -> String {
    Local::now().format(DATETIME_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

impl Note {
    /// Create a note stamped with the current local time
    pub fn new(id: RecordId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }
}

impl Entity for Note {
    const KIND: EntityKind = EntityKind::Notes;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("title", self.title.as_str())
            .with("content", self.content.as_str())
            .with("timestamp", self.timestamp.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Due date in `DD-MM-YYYY` form
    pub due_date: String,
    pub done: bool,
}

impl Task {
    /// Create an open task
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
            due_date: due_date.into(),
            done: false,
        }
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Tasks;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("title", self.title.as_str())
            .with("description", self.description.as_str())
            .with("priority", self.priority.as_str())
            .with("due_date", self.due_date.as_str())
            .with("done", self.done)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}

impl Entity for Contact {
    const KIND: EntityKind = EntityKind::Contacts;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("name", self.name.as_str())
            .with("phone", self.phone.as_str())
            .with("email", self.email.as_str())
    }
}

/// An income (positive amount) or expense (negative amount)
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceEntry {
    pub id: RecordId,
    pub amount: f64,
    pub category: String,
    /// Date in `DD-MM-YYYY` form
    pub date: String,
    pub description: String,
}

impl FinanceEntry {
    pub fn new(
        id: RecordId,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            date: date.into(),
            description: description.into(),
        }
    }

    /// Read a finance entry back from a stored record
    ///
    /// Imported records may hold the amount as text; it is parsed here.
    /// Returns `None` when the amount is missing or not numeric.
    pub fn from_record(record: &Record) -> Option<Self> {
        let amount = record.get("amount")?.as_f64()?;
        Some(Self {
            id: record.id(),
            amount,
            category: record.text("category"),
            date: record.text("date"),
            description: record.text("description"),
        })
    }

    /// The entry date, if it is a valid `DD-MM-YYYY` date
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

impl Entity for FinanceEntry {
    const KIND: EntityKind = EntityKind::Finance;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_record(&self) -> Record {
        Record::new(self.id)
            .with("amount", self.amount)
            .with("category", self.category.as_str())
            .with("date", self.date.as_str())
            .with("description", self.description.as_str())
    }
}
