//! Commands shared by every collection
//!
//! list, show, delete, search, export and import behave the same for notes,
//! tasks, contacts and finance entries; each collection's command enum
//! flattens [`CollectionCommands`] into its own.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_record_details, format_record_list};
use crate::error::{AssistantError, AssistantResult};
use crate::models::{EntityKind, Patch, RecordId};
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum CollectionCommands {
    /// List every record
    List,
    /// Show one record
    Show {
        /// Record ID
        id: RecordId,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: RecordId,
    },
    /// Find records containing a keyword in any field (case-insensitive)
    Search {
        keyword: String,
    },
    /// Export the collection to CSV
    Export {
        /// Output file (".csv" is appended when missing)
        file: PathBuf,
    },
    /// Append records from a CSV file
    Import {
        /// CSV file with a header row
        file: PathBuf,
        /// Keep every imported value as text
        #[arg(long)]
        raw: bool,
    },
}

/// Append `.csv` unless the name already ends with it
pub fn with_csv_extension(file: PathBuf) -> PathBuf {
    let has_csv = file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if has_csv {
        file
    } else {
        let mut name = file.into_os_string();
        name.push(".csv");
        PathBuf::from(name)
    }
}

pub fn handle_collection_command(
    storage: &mut Storage,
    settings: &Settings,
    kind: EntityKind,
    cmd: CollectionCommands,
) -> AssistantResult<()> {
    match cmd {
        CollectionCommands::List => {
            let records: Vec<_> = storage.store(kind).records().iter().collect();
            println!("{}", format_record_list(kind, &records));
        }

        CollectionCommands::Show { id } => {
            let record = storage
                .store(kind)
                .get(id)
                .ok_or_else(|| AssistantError::record_not_found(kind.singular(), id))?;
            print!("{}", format_record_details(kind, record));
        }

        CollectionCommands::Delete { id } => {
            if !storage.store_mut(kind).delete(id)? {
                return Err(AssistantError::record_not_found(kind.singular(), id));
            }
            println!("Deleted {} #{}", kind.singular().to_lowercase(), id);
        }

        CollectionCommands::Search { keyword } => {
            let results = storage.store(kind).search(&keyword);
            if results.is_empty() {
                println!("No {} match '{}'.", kind.name(), keyword);
            } else {
                println!("{}", format_record_list(kind, &results));
            }
        }

        CollectionCommands::Export { file } => {
            let path = with_csv_extension(file);
            if storage.store(kind).export_csv(&path)? {
                println!(
                    "Exported {} {} to {}",
                    storage.store(kind).len(),
                    kind.name(),
                    path.display()
                );
            } else {
                println!("No {} to export.", kind.name());
            }
        }

        CollectionCommands::Import { file, raw } => {
            let schema = (settings.coerce_imports && !raw).then_some(kind);
            let store = storage.store_mut(kind);
            let before = store.len();
            if !store.import_csv(&file, schema)? {
                return Err(AssistantError::Import(format!(
                    "File not found: {}",
                    file.display()
                )));
            }
            println!(
                "Imported {} {} from {}",
                store.len() - before,
                kind.name(),
                file.display()
            );
        }
    }

    Ok(())
}

/// Apply a patch built by an edit command, failing when the record is absent
pub fn apply_edit(
    storage: &mut Storage,
    kind: EntityKind,
    id: RecordId,
    patch: Patch,
) -> AssistantResult<()> {
    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    if !storage.store_mut(kind).update(id, &patch)? {
        return Err(AssistantError::record_not_found(kind.singular(), id));
    }
    println!("Updated {} #{}", kind.singular().to_lowercase(), id);
    Ok(())
}

/// Fail with a validation error unless `ok`
pub fn ensure_valid(ok: bool, message: impl FnOnce() -> String) -> AssistantResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AssistantError::Validation(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_csv_extension() {
        assert_eq!(with_csv_extension("notes".into()), PathBuf::from("notes.csv"));
        assert_eq!(with_csv_extension("notes.csv".into()), PathBuf::from("notes.csv"));
        assert_eq!(with_csv_extension("out/n.CSV".into()), PathBuf::from("out/n.CSV"));
        assert_eq!(with_csv_extension("n.txt".into()), PathBuf::from("n.txt.csv"));
    }
}
