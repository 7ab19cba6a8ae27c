//! Assistant - a terminal personal assistant
//!
//! Keeps four record collections (notes, tasks, contacts and finance entries)
//! in local JSON files, exports and imports them as CSV, and evaluates
//! arithmetic with a small parser instead of an interpreter.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: custom error types
//! - `models`: the generic `Record`, per-collection schemas, typed entities
//! - `storage`: `RecordStore` (one JSON file per collection) and `Storage`
//! - `audit`: append-only log of record mutations
//! - `export` / `import`: CSV conversion
//! - `calculator`: tokenizer, recursive-descent parser and evaluator
//! - `validation`: date, email, phone and priority checks
//! - `reports`: finance summaries and date-range reports
//! - `display` / `cli`: terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant::config::{AssistantPaths, Settings};
//! use assistant::storage::Storage;
//!
//! let paths = AssistantPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, &settings)?;
//! ```

pub mod audit;
pub mod calculator;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod reports;
pub mod storage;
pub mod validation;

pub use error::{AssistantError, AssistantResult};
