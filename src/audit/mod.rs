//! Audit logging
//!
//! Records every create, update, delete and import performed through a
//! record store in an append-only JSONL file, with before/after record
//! snapshots and a short diff for updates.
//!
//! - `AuditEntry`: one logged operation.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: field-level summary of an update.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
