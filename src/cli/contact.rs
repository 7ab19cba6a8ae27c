//! Contact CLI commands

use clap::Subcommand;

use super::common::{apply_edit, ensure_valid, handle_collection_command, CollectionCommands};
use crate::config::Settings;
use crate::error::AssistantResult;
use crate::models::{Contact, Entity, Patch, RecordId};
use crate::storage::Storage;
use crate::validation::{validate_email, validate_phone};

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Create a contact
    Add {
        name: String,
        /// At least 10 digits, spaces or hyphens, optional leading +
        #[arg(short, long)]
        phone: String,
        #[arg(short, long)]
        email: String,
    },
    /// Change a contact's fields
    Edit {
        id: RecordId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    #[command(flatten)]
    Collection(CollectionCommands),
}

fn check_phone(phone: &str) -> AssistantResult<()> {
    ensure_valid(validate_phone(phone), || {
        format!("Invalid phone number '{}'", phone)
    })
}

fn check_email(email: &str) -> AssistantResult<()> {
    ensure_valid(validate_email(email), || {
        format!("Invalid email address '{}'", email)
    })
}

pub fn handle_contact_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: ContactCommands,
) -> AssistantResult<()> {
    match cmd {
        ContactCommands::Add { name, phone, email } => {
            check_phone(&phone)?;
            check_email(&email)?;

            let contact = Contact::new(storage.contacts.next_id()?, name, phone, email);
            storage.contacts.add_entity(&contact)?;
            println!("Created contact #{}: {}", contact.id, contact.name);
        }

        ContactCommands::Edit {
            id,
            name,
            phone,
            email,
        } => {
            let mut patch = Patch::new();
            if let Some(name) = name {
                patch.insert("name", name);
            }
            if let Some(phone) = phone {
                check_phone(&phone)?;
                patch.insert("phone", phone);
            }
            if let Some(email) = email {
                check_email(&email)?;
                patch.insert("email", email);
            }
            apply_edit(storage, Contact::KIND, id, patch)?;
        }

        ContactCommands::Collection(cmd) => {
            handle_collection_command(storage, settings, Contact::KIND, cmd)?;
        }
    }

    Ok(())
}
