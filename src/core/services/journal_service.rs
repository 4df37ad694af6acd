//! Write-side façade over the journal posting engine.
//!
//! Callers (thin route handlers) go through this service; it orchestrates
//! the engine, the WIP adjustment sync, and event publication so the engine
//! itself never has to call back into WIP recomputation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{EntryKind, EntryStatus};
use crate::events::{EventBus, LedgerEvent};
use crate::ledger::{journal, wip, Book, StatusChangeOutcome};

/// Result of a journal-entry deletion, per the caller contract.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeleteOutcome {
    pub count: usize,
}

pub struct JournalService;

impl JournalService {
    /// Records a status transition and everything that hangs off it: the
    /// posting pair rewrite, the history row, the WIP adjustment for the
    /// entry's project, and event publication.
    pub fn record_status_change(
        book: &mut Book,
        bus: &EventBus,
        entry_id: Uuid,
        new_status: EntryStatus,
        changed_by: Option<&str>,
        notes: Option<&str>,
    ) -> ServiceResult<StatusChangeOutcome> {
        Self::record_status_change_at(book, bus, entry_id, new_status, changed_by, notes, Utc::now())
    }

    /// As [`record_status_change`](Self::record_status_change) with an
    /// explicit clock, for deterministic payment dates under test.
    pub fn record_status_change_at(
        book: &mut Book,
        bus: &EventBus,
        entry_id: Uuid,
        new_status: EntryStatus,
        changed_by: Option<&str>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> ServiceResult<StatusChangeOutcome> {
        let outcome = journal::record_status_change(
            book, entry_id, new_status, changed_by, notes, now,
        )
        .map_err(ServiceError::from)?;

        for event in &outcome.events {
            if let LedgerEvent::PostingsChanged { project_id, .. } = event {
                wip::sync_project_adjustment(book, *project_id).map_err(ServiceError::from)?;
            }
        }
        bus.publish_all(&outcome.events);
        Ok(outcome)
    }

    /// Deletes every posting correlated to the given record.
    pub fn delete_journal_entries(
        book: &mut Book,
        kind: EntryKind,
        entry_id: Uuid,
    ) -> ServiceResult<DeleteOutcome> {
        let count = journal::delete_postings(book, kind, entry_id);
        info!(%kind, entry = %entry_id, count, "journal entries deleted");
        Ok(DeleteOutcome { count })
    }

    /// Deletes a record with referential cleanup: postings first, then the
    /// record, then the project's WIP adjustment resync.
    pub fn delete_entry(
        book: &mut Book,
        bus: &EventBus,
        entry_id: Uuid,
    ) -> ServiceResult<DeleteOutcome> {
        let entry = book
            .entry(entry_id)
            .ok_or_else(|| ServiceError::Invalid(format!("entry {entry_id} not found")))?;
        let kind = entry.kind;
        let project_id = entry.project_id;

        let count = journal::delete_entry(book, entry_id).map_err(ServiceError::from)?;
        wip::sync_project_adjustment(book, project_id).map_err(ServiceError::from)?;
        bus.publish(&LedgerEvent::PostingsChanged {
            kind,
            entry_id,
            project_id,
        });
        Ok(DeleteOutcome { count })
    }
}
