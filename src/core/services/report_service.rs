//! Read-side façade producing the report payloads callers serialize.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::core::services::ServiceResult;
use crate::ledger::{balance_sheet, BalanceSheet, Book, ComparativeBalanceSheet};

/// Envelope shape shared with the surrounding application.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope<T> {
    pub success: bool,
    pub data: T,
}

pub struct ReportService;

impl ReportService {
    /// Assembles the balance sheet as of `date`, defaulting to today.
    ///
    /// Never fails on report content: an unbalanced sheet is flagged inside
    /// the summary, and an empty book yields a zeroed report.
    pub fn generate_balance_sheet(
        book: &Book,
        date: Option<NaiveDate>,
    ) -> ServiceResult<ReportEnvelope<BalanceSheet>> {
        let as_of = date.unwrap_or_else(|| Utc::now().date_naive());
        let sheet = balance_sheet::assemble(book, as_of);
        debug!(%as_of, balanced = sheet.summary.is_balanced, "balance sheet generated");
        Ok(ReportEnvelope {
            success: true,
            data: sheet,
        })
    }

    pub fn generate_comparative_balance_sheet(
        book: &Book,
        current_date: NaiveDate,
        previous_date: NaiveDate,
    ) -> ServiceResult<ReportEnvelope<ComparativeBalanceSheet>> {
        let report = balance_sheet::assemble_comparative(book, current_date, previous_date);
        Ok(ReportEnvelope {
            success: true,
            data: report,
        })
    }
}
