//! Note CLI commands

use clap::Subcommand;

use super::common::{apply_edit, handle_collection_command, CollectionCommands};
use crate::config::Settings;
use crate::error::AssistantResult;
use crate::models::{now_timestamp, Entity, Note, Patch, RecordId};
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a note stamped with the current time
    Add {
        title: String,
        /// Note body
        #[arg(default_value = "")]
        content: String,
    },
    /// Change a note's title or content (refreshes its timestamp)
    Edit {
        id: RecordId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    #[command(flatten)]
    Collection(CollectionCommands),
}

pub fn handle_note_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: NoteCommands,
) -> AssistantResult<()> {
    match cmd {
        NoteCommands::Add { title, content } => {
            let note = Note::new(storage.notes.next_id()?, title, content);
            storage.notes.add_entity(&note)?;
            println!("Created note #{}: {}", note.id, note.title);
        }

        NoteCommands::Edit { id, title, content } => {
            let mut patch = Patch::new();
            if let Some(title) = title {
                patch.insert("title", title);
            }
            if let Some(content) = content {
                patch.insert("content", content);
            }
            if !patch.is_empty() {
                patch.insert("timestamp", now_timestamp());
            }
            apply_edit(storage, Note::KIND, id, patch)?;
        }

        NoteCommands::Collection(cmd) => {
            handle_collection_command(storage, settings, Note::KIND, cmd)?;
        }
    }

    Ok(())
}
