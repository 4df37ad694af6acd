//! Journal posting engine.
//!
//! Converts business-status transitions on cost and billing records into
//! balanced debit/credit posting pairs. Both legs of a pair are built and
//! validated before either touches the book, so a failed transition leaves
//! no partial write behind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    correlation_prefix, AccountCode, Direction, EntryKind, EntryRecord, EntryStatus, Posting,
    StatusHistory,
};
use crate::errors::{AccountingError, Result};
use crate::events::LedgerEvent;
use crate::ledger::book::Book;
use crate::ledger::chart::{self, ChartRegistry};

/// What a committed status transition did to the book.
#[derive(Debug, Clone)]
pub struct StatusChangeOutcome {
    pub entry_id: Uuid,
    pub kind: EntryKind,
    pub old_status: EntryStatus,
    pub new_status: EntryStatus,
    pub postings_created: usize,
    pub postings_deleted: usize,
    /// Events for downstream observers (WIP recomputation, audit hooks).
    pub events: Vec<LedgerEvent>,
}

/// Records a status transition: validates it, rewrites postings as the new
/// status demands, appends exactly one history row.
///
/// `now` is caller-supplied so that payment postings and audit timestamps
/// stay deterministic under test.
pub fn record_status_change(
    book: &mut Book,
    entry_id: Uuid,
    new_status: EntryStatus,
    changed_by: Option<&str>,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<StatusChangeOutcome> {
    let entry = book
        .entry(entry_id)
        .cloned()
        .ok_or(AccountingError::EntryNotFound(entry_id))?;
    let old_status = entry.status;

    if !old_status.can_transition_to(new_status) {
        return Err(AccountingError::Validation(format!(
            "{} #{} cannot transition {} -> {}",
            entry.kind, entry.id, old_status, new_status
        )));
    }
    if entry.category.kind() != entry.kind {
        return Err(AccountingError::Validation(format!(
            "{} #{} carries a {} category",
            entry.kind,
            entry.id,
            entry.category.kind()
        )));
    }

    let mut postings_created = 0;
    let mut postings_deleted = 0;

    if entry.create_journal_entry {
        match new_status {
            EntryStatus::Unpaid => {
                // Build first: a failed build must not consume the old pair.
                let pair = build_unpaid_pair(book, &entry)?;
                postings_deleted = delete_postings(book, entry.kind, entry.id);
                postings_created = pair.len();
                book.postings.extend(pair);
            }
            EntryStatus::Paid => {
                // The unpaid pair is retained; the settlement pair offsets the
                // receivable/payable while cash and revenue/expense remain.
                let pair = build_settlement_pair(book, &entry, now.date_naive())?;
                postings_created = pair.len();
                book.postings.extend(pair);
            }
            EntryStatus::Rejected => {
                postings_deleted = delete_postings(book, entry.kind, entry.id);
            }
            EntryStatus::Pending => {}
        }
    }

    if let Some(record) = book.entry_mut(entry_id) {
        record.status = new_status;
    }
    book.record_history(StatusHistory::new(
        entry_id, old_status, new_status, changed_by, notes, now,
    ));

    let mut events = vec![LedgerEvent::StatusRecorded {
        entry_id,
        old_status,
        new_status,
    }];
    if postings_created > 0 || postings_deleted > 0 {
        events.push(LedgerEvent::PostingsChanged {
            kind: entry.kind,
            entry_id,
            project_id: entry.project_id,
        });
    }

    info!(
        kind = %entry.kind,
        entry = %entry_id,
        from = %old_status,
        to = %new_status,
        created = postings_created,
        deleted = postings_deleted,
        "status transition recorded"
    );

    Ok(StatusChangeOutcome {
        entry_id,
        kind: entry.kind,
        old_status,
        new_status,
        postings_created,
        postings_deleted,
        events,
    })
}

/// Removes every posting correlated to the given record. Returns the number
/// of legs removed.
pub fn delete_postings(book: &mut Book, kind: EntryKind, entry_id: Uuid) -> usize {
    let prefix = correlation_prefix(kind, entry_id);
    let before = book.postings.len();
    book.postings.retain(|posting| !posting.correlates_with(&prefix));
    let removed = before - book.postings.len();
    if removed > 0 {
        debug!(%prefix, removed, "correlated postings deleted");
        book.touch();
    }
    removed
}

/// Deletes a record and its postings: referential cleanup first, then the
/// entry itself. Returns the number of postings removed.
pub fn delete_entry(book: &mut Book, entry_id: Uuid) -> Result<usize> {
    let kind = book
        .entry(entry_id)
        .map(|entry| entry.kind)
        .ok_or(AccountingError::EntryNotFound(entry_id))?;
    let removed = delete_postings(book, kind, entry_id);
    book.entries.retain(|entry| entry.id != entry_id);
    book.touch();
    Ok(removed)
}

fn build_unpaid_pair(book: &Book, entry: &EntryRecord) -> Result<Vec<Posting>> {
    let registry = ChartRegistry::validate(&book.accounts)?;
    require_project(book, entry)?;
    let category_code = entry.category.account_code();
    registry.require(&category_code)?;

    let prefix = correlation_prefix(entry.kind, entry.id);
    let description = format!("{prefix} {}", entry.description);
    let (debit_code, credit_code) = match entry.kind {
        // Expense up, payable up.
        EntryKind::Cost => (category_code, chart::PAYABLE.into()),
        // Receivable up, revenue up.
        EntryKind::Billing => (chart::RECEIVABLE.into(), category_code),
    };
    Ok(vec![
        Posting::new(
            entry.date,
            Direction::Debit,
            debit_code,
            description.clone(),
            entry.amount,
            Some(entry.project_id),
        ),
        Posting::new(
            entry.date,
            Direction::Credit,
            credit_code,
            description,
            entry.amount,
            Some(entry.project_id),
        ),
    ])
}

fn build_settlement_pair(
    book: &Book,
    entry: &EntryRecord,
    payment_date: NaiveDate,
) -> Result<Vec<Posting>> {
    let registry = ChartRegistry::validate(&book.accounts)?;
    require_project(book, entry)?;
    registry.require(&chart::CASH.into())?;

    let prefix = correlation_prefix(entry.kind, entry.id);
    let description = format!("{prefix} payment for {}", entry.description);
    let (debit_code, credit_code): (AccountCode, AccountCode) = match entry.kind {
        // Payable down, cash out.
        EntryKind::Cost => (chart::PAYABLE.into(), chart::CASH.into()),
        // Cash in, receivable down.
        EntryKind::Billing => (chart::CASH.into(), chart::RECEIVABLE.into()),
    };
    Ok(vec![
        Posting::new(
            payment_date,
            Direction::Debit,
            debit_code,
            description.clone(),
            entry.amount,
            Some(entry.project_id),
        ),
        Posting::new(
            payment_date,
            Direction::Credit,
            credit_code,
            description,
            entry.amount,
            Some(entry.project_id),
        ),
    ])
}

fn require_project(book: &Book, entry: &EntryRecord) -> Result<()> {
    if book.project(entry.project_id).is_some() {
        return Ok(());
    }
    Err(AccountingError::ReferentialIntegrity {
        kind: match entry.kind {
            EntryKind::Cost => "Cost",
            EntryKind::Billing => "Billing",
        },
        id: entry.id,
        detail: format!("project {} does not exist", entry.project_id),
    })
}

/// Correlation prefixes whose debit and credit legs do not sum to the same
/// amount. Structurally impossible through this engine; surfaced as a
/// data-quality signal and consumed by the compensating path.
pub fn find_unbalanced_correlations(book: &Book) -> Vec<String> {
    let mut sums: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for posting in &book.postings {
        let Some(split) = posting.description.find(':') else {
            continue;
        };
        let prefix = posting.description[..=split].to_string();
        let slot = sums.entry(prefix).or_default();
        match posting.direction {
            Direction::Debit => slot.0 += posting.amount,
            Direction::Credit => slot.1 += posting.amount,
        }
    }
    sums.into_iter()
        .filter(|(_, (debit, credit))| debit != credit)
        .map(|(prefix, _)| prefix)
        .collect()
}

/// Compensates detected partial writes by removing every leg of the affected
/// correlations. Returns the prefixes that were purged.
pub fn compensate_partial_writes(book: &mut Book) -> Vec<String> {
    let unbalanced = find_unbalanced_correlations(book);
    for prefix in &unbalanced {
        warn!(%prefix, "purging orphaned legs for unbalanced correlation");
        book.postings.retain(|posting| !posting.correlates_with(prefix));
    }
    if !unbalanced.is_empty() {
        book.touch();
    }
    unbalanced
}
