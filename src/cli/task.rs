//! Task CLI commands

use clap::Subcommand;

use super::common::{apply_edit, ensure_valid, handle_collection_command, CollectionCommands};
use crate::config::Settings;
use crate::error::{AssistantError, AssistantResult};
use crate::models::{Entity, Patch, Priority, RecordId, Task};
use crate::storage::Storage;
use crate::validation::{validate_date, validate_priority};

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create an open task
    Add {
        title: String,
        /// Due date (DD-MM-YYYY)
        #[arg(long)]
        due: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// High, Medium or Low
        #[arg(short, long, default_value = "Medium")]
        priority: String,
    },
    /// Change a task's fields
    Edit {
        id: RecordId,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// High, Medium or Low
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date (DD-MM-YYYY)
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark a task as done
    Done {
        id: RecordId,
    },
    #[command(flatten)]
    Collection(CollectionCommands),
}

fn parse_priority(s: &str) -> AssistantResult<Priority> {
    validate_priority(s).ok_or_else(|| {
        AssistantError::Validation(format!(
            "Invalid priority '{}'. Use High, Medium or Low",
            s
        ))
    })
}

fn check_due(due: &str) -> AssistantResult<()> {
    ensure_valid(validate_date(due, false), || {
        format!("Invalid due date '{}'. Use DD-MM-YYYY", due)
    })
}

pub fn handle_task_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: TaskCommands,
) -> AssistantResult<()> {
    match cmd {
        TaskCommands::Add {
            title,
            due,
            description,
            priority,
        } => {
            let priority = parse_priority(&priority)?;
            check_due(&due)?;

            let task = Task::new(storage.tasks.next_id()?, title, description, priority, due);
            storage.tasks.add_entity(&task)?;
            println!("Created task #{}: {}", task.id, task.title);
            println!("  Priority: {}", task.priority);
            println!("  Due:      {}", task.due_date);
        }

        TaskCommands::Edit {
            id,
            title,
            description,
            priority,
            due,
        } => {
            let mut patch = Patch::new();
            if let Some(title) = title {
                patch.insert("title", title);
            }
            if let Some(description) = description {
                patch.insert("description", description);
            }
            if let Some(priority) = priority {
                patch.insert("priority", parse_priority(&priority)?.as_str());
            }
            if let Some(due) = due {
                check_due(&due)?;
                patch.insert("due_date", due);
            }
            apply_edit(storage, Task::KIND, id, patch)?;
        }

        TaskCommands::Done { id } => {
            if !storage.tasks.update(id, &Patch::new().set("done", true))? {
                return Err(AssistantError::record_not_found(Task::KIND.singular(), id));
            }
            println!("Task #{} marked as done", id);
        }

        TaskCommands::Collection(cmd) => {
            handle_collection_command(storage, settings, Task::KIND, cmd)?;
        }
    }

    Ok(())
}
