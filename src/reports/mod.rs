//! Reports module
//!
//! Finance summaries, per-category totals and date-range reports.

pub mod finance;

pub use finance::{by_category, CategoryTotal, FinanceReport, FinanceSummary};
