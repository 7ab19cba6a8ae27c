//! Audit history command

use crate::audit::AuditLogger;
use crate::error::AssistantResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_history_command(storage: &Storage, limit: usize) -> AssistantResult<()> {
    let logger = AuditLogger::new(storage.paths().audit_log());
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No history recorded.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
