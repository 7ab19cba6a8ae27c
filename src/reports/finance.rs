//! Finance summaries and reports
//!
//! Totals over the finance collection, a per-category lookup, and a
//! date-range report with per-category sums that can be saved as CSV.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{AssistantError, AssistantResult};
use crate::models::{FinanceEntry, Record};
use crate::validation::DATE_FORMAT;

/// Income, expenses and balance over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinanceSummary {
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of negative amounts (zero or negative)
    pub expenses: f64,
    pub balance: f64,
    pub entry_count: usize,
}

impl FinanceSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FinanceEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            if entry.amount > 0.0 {
                summary.income += entry.amount;
            } else if entry.amount < 0.0 {
                summary.expenses += entry.amount;
            }
            summary.entry_count += 1;
        }
        summary.balance = summary.income + summary.expenses;
        summary
    }

    /// Summarise stored records, skipping any without a numeric amount
    pub fn from_records(records: &[Record]) -> Self {
        let entries = readable_entries(records);
        Self::from_entries(&entries)
    }
}

/// Entries in one category and their total
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub entries: Vec<FinanceEntry>,
    pub total: f64,
}

/// Entries whose category matches `category`, ignoring case
pub fn by_category(records: &[Record], category: &str) -> CategoryTotal {
    let wanted = category.to_lowercase();
    let entries: Vec<FinanceEntry> = readable_entries(records)
        .into_iter()
        .filter(|e| e.category.to_lowercase() == wanted)
        .collect();
    let total = entries.iter().map(|e| e.amount).sum();

    CategoryTotal {
        category: category.to_string(),
        entries,
        total,
    }
}

/// Finance report for an inclusive date range
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: FinanceSummary,
    /// Net amount per category, in the order categories first appear
    pub categories: Vec<(String, f64)>,
}

impl FinanceReport {
    /// Build the report from stored finance records
    ///
    /// Records whose amount or date cannot be read are skipped with a warning.
    pub fn generate(records: &[Record], start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut in_range = Vec::new();
        for record in records {
            let Some(entry) = FinanceEntry::from_record(record) else {
                tracing::warn!(id = record.id(), "skipping finance record without a numeric amount");
                continue;
            };
            let Some(date) = entry.parsed_date() else {
                tracing::warn!(id = record.id(), date = %entry.date, "skipping finance record with an unreadable date");
                continue;
            };
            if start_date <= date && date <= end_date {
                in_range.push(entry);
            }
        }

        let mut categories: Vec<(String, f64)> = Vec::new();
        for entry in &in_range {
            match categories.iter_mut().find(|(name, _)| *name == entry.category) {
                Some((_, total)) => *total += entry.amount,
                None => categories.push((entry.category.clone(), entry.amount)),
            }
        }

        Self {
            start_date,
            end_date,
            summary: FinanceSummary::from_entries(&in_range),
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.entry_count == 0
    }

    /// `report_<start>_<end>.csv`, dates in `DD-MM-YYYY` form
    pub fn file_name(&self) -> String {
        format!(
            "report_{}_{}.csv",
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT)
        )
    }

    /// Write the per-category table as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> AssistantResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Category", "Amount"])?;
        for (category, amount) in &self.categories {
            csv_writer.write_record([category.as_str(), &format!("{:.2}", amount)])?;
        }
        csv_writer
            .flush()
            .map_err(|e| AssistantError::Export(e.to_string()))
    }

    /// Save the report into `dir`, returning the file written
    pub fn write_csv(&self, dir: &Path) -> AssistantResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .map_err(|e| AssistantError::Io(format!("Failed to create {}: {}", dir.display(), e)))?;

        let path = dir.join(self.file_name());
        let file = File::create(&path).map_err(|e| {
            AssistantError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        self.export_csv(file)?;

        tracing::info!(path = %path.display(), "finance report written");
        Ok(path)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Finance Report: {} to {}\n",
            self.start_date.format(DATE_FORMAT),
            self.end_date.format(DATE_FORMAT)
        ));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("Total income:   {:>12.2}\n", self.summary.income));
        output.push_str(&format!("Total expenses: {:>12.2}\n", self.summary.expenses.abs()));
        output.push_str(&format!("Balance:        {:>12.2}\n", self.summary.balance));

        output.push_str("\nBy category:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for (category, amount) in &self.categories {
            output.push_str(&format!("{:<26} {:>12.2}\n", category, amount));
        }

        output
    }
}

fn readable_entries(records: &[Record]) -> Vec<FinanceEntry> {
    records.iter().filter_map(FinanceEntry::from_record).collect()
}
