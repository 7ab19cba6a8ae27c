//! Export module
//!
//! CSV export of record collections. Finance reports have their own writer in
//! `reports`.

pub mod csv;

pub use self::csv::{check_uniform, export_records_csv, header_for};
