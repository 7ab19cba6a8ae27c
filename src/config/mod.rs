//! Configuration module
//!
//! - Base directory resolution (`ASSISTANT_DATA_DIR` or the platform config dir)
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::AssistantPaths;
pub use settings::Settings;
