//! Work-In-Progress valuation.
//!
//! Per ongoing project, cumulative costs are netted against cumulative
//! billings. Positive WIP is unbilled earned value (asset side); negative
//! WIP is a customer advance (liability side). The two pools are tracked
//! separately and never netted against each other.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Direction, EntryKind, EntryStatus, Posting, ProjectStatus};
use crate::errors::{AccountingError, Result};
use crate::ledger::book::Book;
use crate::ledger::chart;

/// WIP figure for a single project.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectWip {
    pub project_id: Uuid,
    pub project_name: String,
    pub costs: Decimal,
    pub billed: Decimal,
    pub wip: Decimal,
}

/// Valuation across all ongoing projects as of a report date.
#[derive(Debug, Clone, Serialize, Default)]
pub struct WipValuation {
    pub rows: Vec<ProjectWip>,
    /// Sum of positive WIP figures only.
    pub total_wip: Decimal,
    /// Sum of |wip| over projects with negative WIP only.
    pub total_negative_wip: Decimal,
}

/// Pure valuation over entry amounts (not postings): projects with status
/// `Ongoing` and a start date on or before `as_of`, entries dated on or
/// before `as_of`. Rejected entries never count.
pub fn valuate_wip(book: &Book, as_of: NaiveDate) -> WipValuation {
    let mut valuation = WipValuation::default();
    for project in &book.projects {
        if project.status != ProjectStatus::Ongoing || project.start_date > as_of {
            continue;
        }
        let (costs, billed) = sum_entries(book, project.id, Some(as_of));
        let wip = costs - billed;
        if wip > Decimal::ZERO {
            valuation.total_wip += wip;
        } else if wip < Decimal::ZERO {
            valuation.total_negative_wip += -wip;
        }
        valuation.rows.push(ProjectWip {
            project_id: project.id,
            project_name: project.name.clone(),
            costs,
            billed,
            wip,
        });
    }
    valuation
}

/// Correlation prefix for a project's WIP adjustment pair.
pub fn adjustment_prefix(project_id: Uuid) -> String {
    format!("WIP #{project_id}:")
}

/// Rewrites the WIP control adjustment for one project.
///
/// The control account (1103) carries the posted mirror of the current
/// valuation, offset against the Change in WIP account (4901), keeping the
/// raw journal in step with the valuation. The balance sheet skips both
/// codes and reads the valuation directly. Exactly one adjustment pair
/// exists per project; it is deleted and reposted on every sync.
pub fn sync_project_adjustment(book: &mut Book, project_id: Uuid) -> Result<Decimal> {
    let project = book
        .project(project_id)
        .cloned()
        .ok_or(AccountingError::ProjectNotFound(project_id))?;

    let prefix = adjustment_prefix(project_id);
    book.postings.retain(|posting| !posting.correlates_with(&prefix));

    let (costs, billed) = sum_entries(book, project_id, None);
    let wip = costs - billed;
    let adjusted_on = book
        .entries
        .iter()
        .filter(|entry| entry.project_id == project_id && entry.status != EntryStatus::Rejected)
        .map(|entry| entry.date)
        .max()
        .unwrap_or(project.start_date);

    if project.status == ProjectStatus::Ongoing && wip != Decimal::ZERO {
        let description = format!("{prefix} revaluation of {}", project.name);
        let (debit_code, credit_code) = if wip > Decimal::ZERO {
            (chart::WIP_CONTROL, chart::WIP_CHANGE)
        } else {
            (chart::WIP_CHANGE, chart::WIP_CONTROL)
        };
        let amount = wip.abs();
        book.postings.push(Posting::new(
            adjusted_on,
            Direction::Debit,
            debit_code,
            description.clone(),
            amount,
            Some(project_id),
        ));
        book.postings.push(Posting::new(
            adjusted_on,
            Direction::Credit,
            credit_code,
            description,
            amount,
            Some(project_id),
        ));
    }
    book.touch();
    debug!(project = %project.name, %wip, "WIP adjustment synced");
    Ok(wip)
}

fn sum_entries(book: &Book, project_id: Uuid, as_of: Option<NaiveDate>) -> (Decimal, Decimal) {
    let mut costs = Decimal::ZERO;
    let mut billed = Decimal::ZERO;
    for entry in &book.entries {
        if entry.project_id != project_id || entry.status == EntryStatus::Rejected {
            continue;
        }
        if let Some(cutoff) = as_of {
            if entry.date > cutoff {
                continue;
            }
        }
        match entry.kind {
            EntryKind::Cost => costs += entry.amount,
            EntryKind::Billing => billed += entry.amount,
        }
    }
    (costs, billed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BillingCategory, CostCategory, EntryCategory, EntryRecord, Project,
    };
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_book(costs: Decimal, billed: Decimal) -> (Book, Uuid) {
        let mut book = Book::new("WIP");
        let project_id = book.add_project(Project::new(
            "Bridge",
            dec!(2000000000),
            ProjectStatus::Ongoing,
            date(2024, 1, 1),
        ));
        let mut cost = EntryRecord::new(
            EntryKind::Cost,
            project_id,
            date(2024, 2, 1),
            costs,
            EntryCategory::Cost(CostCategory::Material),
            "materials",
        );
        cost.status = EntryStatus::Unpaid;
        book.add_entry(cost);
        let mut billing = EntryRecord::new(
            EntryKind::Billing,
            project_id,
            date(2024, 2, 15),
            billed,
            EntryCategory::Billing(BillingCategory::Construction),
            "progress billing",
        );
        billing.status = EntryStatus::Unpaid;
        book.add_entry(billing);
        (book, project_id)
    }

    #[test]
    fn positive_wip_lands_in_the_asset_pool_only() {
        let (book, _) = seeded_book(dec!(500000), dec!(200000));
        let valuation = valuate_wip(&book, date(2024, 3, 1));
        assert_eq!(valuation.rows.len(), 1);
        assert_eq!(valuation.rows[0].wip, dec!(300000));
        assert_eq!(valuation.total_wip, dec!(300000));
        assert_eq!(valuation.total_negative_wip, Decimal::ZERO);
    }

    #[test]
    fn negative_wip_lands_in_the_liability_pool_only() {
        let (book, _) = seeded_book(dec!(200000), dec!(500000));
        let valuation = valuate_wip(&book, date(2024, 3, 1));
        assert_eq!(valuation.rows[0].wip, dec!(-300000));
        assert_eq!(valuation.total_wip, Decimal::ZERO);
        assert_eq!(valuation.total_negative_wip, dec!(300000));
    }

    #[test]
    fn projects_not_yet_started_are_excluded() {
        let (mut book, _) = seeded_book(dec!(500000), dec!(200000));
        book.add_project(Project::new(
            "Future Tower",
            dec!(1000000),
            ProjectStatus::Ongoing,
            date(2025, 1, 1),
        ));
        let valuation = valuate_wip(&book, date(2024, 3, 1));
        assert_eq!(valuation.rows.len(), 1);
    }

    #[test]
    fn sync_keeps_exactly_one_adjustment_pair() {
        let (mut book, project_id) = seeded_book(dec!(500000), dec!(200000));
        sync_project_adjustment(&mut book, project_id).expect("sync");
        sync_project_adjustment(&mut book, project_id).expect("second sync");
        let prefix = adjustment_prefix(project_id);
        let legs: Vec<_> = book
            .postings
            .iter()
            .filter(|posting| posting.correlates_with(&prefix))
            .collect();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].amount, dec!(300000));
    }

    #[test]
    fn zero_wip_clears_the_adjustment() {
        let (mut book, project_id) = seeded_book(dec!(300000), dec!(200000));
        sync_project_adjustment(&mut book, project_id).expect("sync");
        assert_eq!(book.postings.len(), 2);
        // Bill the remainder so costs == billings.
        let mut billing = EntryRecord::new(
            EntryKind::Billing,
            project_id,
            date(2024, 3, 1),
            dec!(100000),
            EntryCategory::Billing(BillingCategory::Construction),
            "final billing",
        );
        billing.status = EntryStatus::Unpaid;
        book.add_entry(billing);
        let wip = sync_project_adjustment(&mut book, project_id).expect("resync");
        assert_eq!(wip, Decimal::ZERO);
        assert!(book.postings.is_empty());
    }
}
