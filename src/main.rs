use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use assistant::cli::{
    handle_calc_command, handle_contact_command, handle_finance_command, handle_history_command,
    handle_note_command, handle_task_command, ContactCommands, FinanceCommands, NoteCommands,
    TaskCommands,
};
use assistant::config::{AssistantPaths, Settings};
use assistant::storage::Storage;

/// Environment variable holding the log filter (e.g. `debug`, `assistant=info`)
const LOG_ENV: &str = "ASSISTANT_LOG";

#[derive(Parser)]
#[command(
    name = "assistant",
    version,
    about = "Terminal personal assistant",
    long_about = "Keep notes, tasks, contacts and finance records in local JSON files, \
                  export and import them as CSV, and evaluate arithmetic safely."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Note management commands
    #[command(subcommand)]
    Note(NoteCommands),

    /// Task management commands
    #[command(subcommand)]
    Task(TaskCommands),

    /// Contact management commands
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Income and expense commands
    #[command(subcommand, alias = "fin")]
    Finance(FinanceCommands),

    /// Evaluate an arithmetic expression, or start an interactive calculator
    Calc {
        /// Expression such as "(2 + 3) * 4"; omit for interactive mode
        #[arg(allow_hyphen_values = true)]
        expression: Option<String>,
    },

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // The calculator touches no files
    let command = match cli.command {
        Some(Commands::Calc { expression }) => {
            handle_calc_command(expression)?;
            return Ok(());
        }
        other => other,
    };

    // Initialize paths and settings
    let paths = AssistantPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::open(paths.clone(), &settings)?;

    match command {
        Some(Commands::Note(cmd)) => handle_note_command(&mut storage, &settings, cmd)?,
        Some(Commands::Task(cmd)) => handle_task_command(&mut storage, &settings, cmd)?,
        Some(Commands::Contact(cmd)) => handle_contact_command(&mut storage, &settings, cmd)?,
        Some(Commands::Finance(cmd)) => handle_finance_command(&mut storage, &settings, cmd)?,
        Some(Commands::History { limit }) => handle_history_command(&storage, limit)?,
        Some(Commands::Config) => {
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("Assistant Configuration");
            println!("=======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Data directory:    {}", paths.data_dir().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Audit enabled:  {}", settings.audit_enabled);
            println!("  Coerce imports: {}", settings.coerce_imports);
            println!("  CSV delimiter:  {:?}", settings.csv_delimiter);
            println!();
            println!("Records:");
            for kind in assistant::models::EntityKind::ALL {
                println!("  {:<9} {}", kind.name(), storage.store(kind).len());
            }
        }
        Some(Commands::Calc { expression }) => handle_calc_command(expression)?,
        None => {
            println!("Assistant - notes, tasks, contacts and finances in your terminal");
            println!();
            println!("Run 'assistant --help' for usage information.");
        }
    }

    Ok(())
}
