//! Data models for the assistant
//!
//! The generic record shape the store persists, the per-kind schemas, and the
//! typed entities the command layer builds.

pub mod entity;
pub mod record;
pub mod schema;

pub use entity::{now_timestamp, Contact, Entity, FinanceEntry, Note, Priority, Task};
pub use record::{FieldValue, Patch, Record, RecordId, ID_FIELD};
pub use schema::{EntityKind, FieldSpec, FieldType};
