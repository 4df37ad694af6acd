//! The accounting book and the four engines that operate on it.

pub mod aggregate;
pub mod balance_sheet;
pub mod book;
pub mod chart;
pub mod journal;
pub mod wip;

pub use aggregate::{aggregate_balances, AccountBalance};
pub use balance_sheet::{
    assemble, assemble_comparative, assemble_with_epsilon, BalanceSheet, BalanceSheetSummary,
    ComparativeBalanceSheet, ComparativeFigures,
};
pub use book::{Book, CURRENT_SCHEMA_VERSION};
pub use chart::{default_chart, ChartRegistry};
pub use journal::{
    compensate_partial_writes, delete_entry, delete_postings, find_unbalanced_correlations,
    record_status_change, StatusChangeOutcome,
};
pub use wip::{sync_project_adjustment, valuate_wip, ProjectWip, WipValuation};
