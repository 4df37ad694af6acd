use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sitebooks::{
    core::services::journal_service::JournalService,
    domain::{
        AccountCode, BillingCategory, CostCategory, Direction, EntryCategory, EntryKind, EntryRecord,
        EntryStatus, Project, ProjectStatus,
    },
    events::EventBus,
    ledger::{chart, valuate_wip, wip, Book},
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(10, 0, 0).unwrap().and_utc()
}

fn ongoing_project(book: &mut Book, name: &str) -> Uuid {
    book.add_project(Project::new(
        name,
        dec!(2000000000),
        ProjectStatus::Ongoing,
        date(2024, 1, 1),
    ))
}

fn approve_cost(book: &mut Book, bus: &EventBus, project_id: Uuid, amount: Decimal) {
    let entry_id = book.add_entry(EntryRecord::new(
        EntryKind::Cost,
        project_id,
        date(2024, 2, 5),
        amount,
        EntryCategory::Cost(CostCategory::Subcontractor),
        "piling works",
    ));
    JournalService::record_status_change_at(
        book,
        bus,
        entry_id,
        EntryStatus::Unpaid,
        None,
        None,
        clock(2024, 2, 6),
    )
    .expect("cost approved");
}

fn approve_billing(book: &mut Book, bus: &EventBus, project_id: Uuid, amount: Decimal) {
    let entry_id = book.add_entry(EntryRecord::new(
        EntryKind::Billing,
        project_id,
        date(2024, 2, 20),
        amount,
        EntryCategory::Billing(BillingCategory::Construction),
        "progress billing",
    ));
    JournalService::record_status_change_at(
        book,
        bus,
        entry_id,
        EntryStatus::Unpaid,
        None,
        None,
        clock(2024, 2, 21),
    )
    .expect("billing approved");
}

#[test]
fn costs_ahead_of_billings_value_as_a_wip_asset() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Harbour Jetty");
    approve_cost(&mut book, &bus, project_id, dec!(500000));
    approve_billing(&mut book, &bus, project_id, dec!(200000));

    let valuation = valuate_wip(&book, date(2024, 3, 1));
    assert_eq!(valuation.rows.len(), 1);
    assert_eq!(valuation.rows[0].costs, dec!(500000));
    assert_eq!(valuation.rows[0].billed, dec!(200000));
    assert_eq!(valuation.rows[0].wip, dec!(300000));
    assert_eq!(valuation.total_wip, dec!(300000));
    assert_eq!(valuation.total_negative_wip, Decimal::ZERO);
}

#[test]
fn billings_ahead_of_costs_value_as_a_customer_advance() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Toll Road");
    approve_cost(&mut book, &bus, project_id, dec!(200000));
    approve_billing(&mut book, &bus, project_id, dec!(500000));

    let valuation = valuate_wip(&book, date(2024, 3, 1));
    assert_eq!(valuation.rows[0].wip, dec!(-300000));
    assert_eq!(valuation.total_wip, Decimal::ZERO);
    assert_eq!(valuation.total_negative_wip, dec!(300000));
}

#[test]
fn opposite_signed_projects_never_net_against_each_other() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let overbilled = ongoing_project(&mut book, "Overbilled");
    let underbilled = ongoing_project(&mut book, "Underbilled");
    approve_cost(&mut book, &bus, underbilled, dec!(800000));
    approve_billing(&mut book, &bus, underbilled, dec!(300000));
    approve_cost(&mut book, &bus, overbilled, dec!(100000));
    approve_billing(&mut book, &bus, overbilled, dec!(400000));

    let valuation = valuate_wip(&book, date(2024, 3, 1));
    assert_eq!(valuation.total_wip, dec!(500000));
    assert_eq!(valuation.total_negative_wip, dec!(300000));
}

#[test]
fn completed_projects_drop_out_of_the_valuation() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Handover");
    approve_cost(&mut book, &bus, project_id, dec!(500000));

    let before = valuate_wip(&book, date(2024, 3, 1));
    assert_eq!(before.rows.len(), 1);

    book.projects[0].status = ProjectStatus::Completed;
    let after = valuate_wip(&book, date(2024, 3, 1));
    assert!(after.rows.is_empty());
    assert_eq!(after.total_wip, Decimal::ZERO);
}

#[test]
fn the_adjustment_pair_mirrors_positive_wip_on_the_control_account() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Jetty");
    approve_cost(&mut book, &bus, project_id, dec!(500000));
    approve_billing(&mut book, &bus, project_id, dec!(200000));

    let prefix = wip::adjustment_prefix(project_id);
    let legs: Vec<_> = book
        .postings
        .iter()
        .filter(|posting| posting.correlates_with(&prefix))
        .collect();
    assert_eq!(legs.len(), 2);
    let debit = legs
        .iter()
        .find(|leg| leg.direction == Direction::Debit)
        .expect("debit leg");
    let credit = legs
        .iter()
        .find(|leg| leg.direction == Direction::Credit)
        .expect("credit leg");
    assert_eq!(debit.account_code, AccountCode::new(chart::WIP_CONTROL));
    assert_eq!(credit.account_code, AccountCode::new(chart::WIP_CHANGE));
    assert_eq!(debit.amount, dec!(300000));
}

#[test]
fn the_adjustment_pair_flips_for_negative_wip() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Advance");
    approve_billing(&mut book, &bus, project_id, dec!(400000));

    let prefix = wip::adjustment_prefix(project_id);
    let debit = book
        .postings
        .iter()
        .find(|posting| {
            posting.correlates_with(&prefix) && posting.direction == Direction::Debit
        })
        .expect("debit leg");
    assert_eq!(debit.account_code, AccountCode::new(chart::WIP_CHANGE));
    assert_eq!(debit.amount, dec!(400000));
}

#[test]
fn valuation_respects_the_report_cutoff() {
    let mut book = Book::new("WIP");
    let bus = EventBus::new();
    let project_id = ongoing_project(&mut book, "Phased");
    approve_cost(&mut book, &bus, project_id, dec!(500000));

    // Before any entry date the project values at zero but still lists.
    let early = valuate_wip(&book, date(2024, 1, 15));
    assert_eq!(early.rows.len(), 1);
    assert_eq!(early.rows[0].wip, Decimal::ZERO);

    let late = valuate_wip(&book, date(2024, 12, 31));
    assert_eq!(late.rows[0].wip, dec!(500000));
}
