use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sitebooks::{
    core::services::{JournalService, ReportService},
    domain::{
        CostCategory, EntryCategory, EntryKind, EntryRecord, EntryStatus, Project, ProjectStatus,
    },
    events::{EventBus, EventSink, LedgerEvent},
    ledger::Book,
};
use uuid::Uuid;

struct Recording(Arc<Mutex<Vec<LedgerEvent>>>);

impl EventSink for Recording {
    fn publish(&self, event: &LedgerEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_book() -> (Book, Uuid) {
    let mut book = Book::new("Service");
    let project_id = book.add_project(Project::new(
        "Depot",
        dec!(800000000),
        ProjectStatus::Ongoing,
        date(2024, 1, 1),
    ));
    let entry_id = book.add_entry(EntryRecord::new(
        EntryKind::Cost,
        project_id,
        date(2024, 2, 1),
        dec!(400000),
        EntryCategory::Cost(CostCategory::Labor),
        "site crew",
    ));
    (book, entry_id)
}

#[test]
fn subscribers_observe_status_and_posting_events_in_order() {
    let (mut book, entry_id) = seeded_book();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.subscribe(Box::new(Recording(Arc::clone(&seen))));

    JournalService::record_status_change(
        &mut book,
        &bus,
        entry_id,
        EntryStatus::Unpaid,
        Some("admin"),
        None,
    )
    .expect("transition");

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        LedgerEvent::StatusRecorded {
            old_status: EntryStatus::Pending,
            new_status: EntryStatus::Unpaid,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        LedgerEvent::PostingsChanged {
            kind: EntryKind::Cost,
            ..
        }
    ));
}

#[test]
fn gated_records_emit_no_posting_event() {
    let mut book = Book::new("Gated");
    let project_id = book.add_project(Project::new(
        "Depot",
        dec!(800000000),
        ProjectStatus::Ongoing,
        date(2024, 1, 1),
    ));
    let entry_id = book.add_entry(
        EntryRecord::new(
            EntryKind::Cost,
            project_id,
            date(2024, 2, 1),
            dec!(400000),
            EntryCategory::Cost(CostCategory::Labor),
            "site crew",
        )
        .without_journal(),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = EventBus::new();
    bus.subscribe(Box::new(Recording(Arc::clone(&seen))));

    JournalService::record_status_change(&mut book, &bus, entry_id, EntryStatus::Unpaid, None, None)
        .expect("transition");

    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], LedgerEvent::StatusRecorded { .. }));
}

#[test]
fn delete_journal_entries_reports_how_many_legs_went() {
    let (mut book, entry_id) = seeded_book();
    let bus = EventBus::new();
    JournalService::record_status_change(&mut book, &bus, entry_id, EntryStatus::Unpaid, None, None)
        .expect("transition");

    let outcome = JournalService::delete_journal_entries(&mut book, EntryKind::Cost, entry_id)
        .expect("delete");
    assert_eq!(outcome.count, 2);

    let again = JournalService::delete_journal_entries(&mut book, EntryKind::Cost, entry_id)
        .expect("idempotent delete");
    assert_eq!(again.count, 0);
}

#[test]
fn delete_entry_cleans_postings_while_history_stays() {
    let (mut book, entry_id) = seeded_book();
    let bus = EventBus::new();
    JournalService::record_status_change(&mut book, &bus, entry_id, EntryStatus::Unpaid, None, None)
        .expect("transition");
    assert_eq!(book.history_for(entry_id).len(), 1);

    JournalService::delete_entry(&mut book, &bus, entry_id).expect("delete");
    assert!(book.entry(entry_id).is_none());
    assert!(book.postings.is_empty());
    // The audit trail outlives the record.
    assert_eq!(book.history_for(entry_id).len(), 1);
}

#[test]
fn report_envelope_wraps_the_balance_sheet() {
    let (mut book, entry_id) = seeded_book();
    let bus = EventBus::new();
    JournalService::record_status_change(&mut book, &bus, entry_id, EntryStatus::Unpaid, None, None)
        .expect("transition");

    let envelope =
        ReportService::generate_balance_sheet(&book, Some(date(2024, 12, 31))).expect("report");
    assert!(envelope.success);
    assert!(envelope.data.summary.is_balanced);
    assert_eq!(envelope.data.summary.total_wip, dec!(400000));

    let json = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(json["success"], true);
    assert!(json["data"]["summary"].get("totalWip").is_some());
}

#[test]
fn comparative_report_service_wraps_both_sheets() {
    let (mut book, entry_id) = seeded_book();
    let bus = EventBus::new();
    JournalService::record_status_change(&mut book, &bus, entry_id, EntryStatus::Unpaid, None, None)
        .expect("transition");

    let envelope = ReportService::generate_comparative_balance_sheet(
        &book,
        date(2024, 12, 31),
        date(2023, 12, 31),
    )
    .expect("report");
    assert!(envelope.success);
    assert_eq!(envelope.data.current.date, date(2024, 12, 31));
    assert_eq!(envelope.data.previous.date, date(2023, 12, 31));
}
