//! CLI command handlers
//!
//! Bridges clap argument parsing with the record stores. Each collection has
//! its own subcommand enum; the shared actions live in `common`.

pub mod calc;
pub mod common;
pub mod contact;
pub mod finance;
pub mod history;
pub mod note;
pub mod task;

pub use calc::handle_calc_command;
pub use common::{handle_collection_command, with_csv_extension, CollectionCommands};
pub use contact::{handle_contact_command, ContactCommands};
pub use finance::{handle_finance_command, FinanceCommands};
pub use history::handle_history_command;
pub use note::{handle_note_command, NoteCommands};
pub use task::{handle_task_command, TaskCommands};
