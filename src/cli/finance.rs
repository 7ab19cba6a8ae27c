//! Finance CLI commands

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use super::common::{apply_edit, ensure_valid, handle_collection_command, CollectionCommands};
use crate::config::Settings;
use crate::display::format_record_list;
use crate::error::{AssistantError, AssistantResult};
use crate::models::{Entity, FinanceEntry, Patch, Record, RecordId};
use crate::reports::{by_category, FinanceReport, FinanceSummary};
use crate::storage::Storage;
use crate::validation::{parse_date, DATE_FORMAT};

#[derive(Subcommand, Debug)]
pub enum FinanceCommands {
    /// Record income (positive amount) or an expense (negative amount)
    Add {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        category: String,
        /// Date (DD-MM-YYYY), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },
    /// Change an entry's fields
    Edit {
        id: RecordId,
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,
        #[arg(short, long)]
        category: Option<String>,
        /// Date (DD-MM-YYYY)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Show income, expenses and balance over every entry
    Summary,
    /// List entries in one category (case-insensitive) with their total
    Category {
        name: String,
    },
    /// Totals and per-category sums for a date range, saved as CSV
    Report {
        /// First day (DD-MM-YYYY), inclusive
        start: String,
        /// Last day (DD-MM-YYYY), inclusive
        end: String,
        /// Directory for the report file (defaults to the reports directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    #[command(flatten)]
    Collection(CollectionCommands),
}

fn check_date(date: &str) -> AssistantResult<()> {
    ensure_valid(parse_date(date).is_some(), || {
        format!("Invalid date '{}'. Use DD-MM-YYYY", date)
    })
}

fn check_amount(amount: f64) -> AssistantResult<()> {
    ensure_valid(amount.is_finite(), || format!("Invalid amount '{}'", amount))
}

pub fn handle_finance_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: FinanceCommands,
) -> AssistantResult<()> {
    match cmd {
        FinanceCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            check_amount(amount)?;
            let date = date.unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string());
            check_date(&date)?;

            let entry = FinanceEntry::new(
                storage.finance.next_id()?,
                amount,
                category,
                date,
                description,
            );
            storage.finance.add_entity(&entry)?;
            println!(
                "Recorded #{}: {:.2} in {} on {}",
                entry.id, entry.amount, entry.category, entry.date
            );
        }

        FinanceCommands::Edit {
            id,
            amount,
            category,
            date,
            description,
        } => {
            let mut patch = Patch::new();
            if let Some(amount) = amount {
                check_amount(amount)?;
                patch.insert("amount", amount);
            }
            if let Some(category) = category {
                patch.insert("category", category);
            }
            if let Some(date) = date {
                check_date(&date)?;
                patch.insert("date", date);
            }
            if let Some(description) = description {
                patch.insert("description", description);
            }
            apply_edit(storage, FinanceEntry::KIND, id, patch)?;
        }

        FinanceCommands::Summary => {
            let summary = FinanceSummary::from_records(storage.finance.records());
            println!("Entries:  {}", summary.entry_count);
            println!("Income:   {:.2}", summary.income);
            println!("Expenses: {:.2}", summary.expenses.abs());
            println!("Balance:  {:.2}", summary.balance);
        }

        FinanceCommands::Category { name } => {
            let result = by_category(storage.finance.records(), &name);
            if result.entries.is_empty() {
                println!("No entries in category '{}'.", name);
                return Ok(());
            }
            let records: Vec<Record> = result.entries.iter().map(Entity::to_record).collect();
            let refs: Vec<&Record> = records.iter().collect();
            println!("{}", format_record_list(FinanceEntry::KIND, &refs));
            println!("Total for {}: {:.2}", result.category, result.total);
        }

        FinanceCommands::Report { start, end, out } => {
            let start_date = parse_date(&start).ok_or_else(|| {
                AssistantError::Validation(format!("Invalid start date '{}'. Use DD-MM-YYYY", start))
            })?;
            let end_date = parse_date(&end).ok_or_else(|| {
                AssistantError::Validation(format!("Invalid end date '{}'. Use DD-MM-YYYY", end))
            })?;
            ensure_valid(start_date <= end_date, || {
                format!("Start date {} is after end date {}", start, end)
            })?;

            let report = FinanceReport::generate(storage.finance.records(), start_date, end_date);
            if report.is_empty() {
                println!("No finance entries between {} and {}.", start, end);
                return Ok(());
            }

            print!("{}", report.format_terminal());
            let dir = out.unwrap_or_else(|| storage.paths().reports_dir());
            let path = report.write_csv(&dir)?;
            println!();
            println!("Report saved to {}", path.display());
        }

        FinanceCommands::Collection(cmd) => {
            handle_collection_command(storage, settings, FinanceEntry::KIND, cmd)?;
        }
    }

    Ok(())
}
