//! Audit entry data structures
//!
//! Defines the operation types and the entry format written for every change
//! made through a record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Record, RecordId};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Record was added
    Create,
    /// Record was merge-updated
    Update,
    /// Record was removed
    Delete,
    /// Record was appended from a CSV import
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Collection the record belongs to (e.g. "notes")
    pub collection: String,

    pub record_id: RecordId,

    /// Record before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Record>,

    /// Record after the operation (creates, imports and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Record>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, collection: &str, record_id: RecordId) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            collection: collection.to_string(),
            record_id,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a record added through the store
    pub fn create(collection: &str, record: &Record) -> Self {
        Self {
            after: Some(record.clone()),
            ..Self::new(Operation::Create, collection, record.id())
        }
    }

    /// Entry for a record appended by a CSV import
    pub fn import(collection: &str, record: &Record) -> Self {
        Self {
            after: Some(record.clone()),
            ..Self::new(Operation::Import, collection, record.id())
        }
    }

    /// Entry for a merge update
    pub fn update(
        collection: &str,
        before: &Record,
        after: &Record,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: Some(before.clone()),
            after: Some(after.clone()),
            diff_summary,
            ..Self::new(Operation::Update, collection, after.id())
        }
    }

    /// Entry for a removed record
    pub fn delete(collection: &str, record: &Record) -> Self {
        Self {
            before: Some(record.clone()),
            ..Self::new(Operation::Delete, collection, record.id())
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} #{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.collection,
            self.record_id
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
