use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::account::AccountCode;
use crate::domain::common::Identifiable;

/// The two business record kinds whose status transitions drive postings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Cost,
    Billing,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Cost => f.write_str("Cost"),
            EntryKind::Billing => f.write_str("Billing"),
        }
    }
}

/// Business status of a cost or billing record.
///
/// `Pending` is the implicit initial state. `Paid` and `Rejected` are
/// terminal with respect to posting side effects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Unpaid,
    Paid,
    Rejected,
}

impl EntryStatus {
    /// Allowed transitions. Re-issuing `unpaid` is permitted so that the
    /// posting engine can idempotently rebuild the pair for an edited amount.
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Pending, EntryStatus::Unpaid)
                | (EntryStatus::Pending, EntryStatus::Rejected)
                | (EntryStatus::Unpaid, EntryStatus::Unpaid)
                | (EntryStatus::Unpaid, EntryStatus::Paid)
                | (EntryStatus::Unpaid, EntryStatus::Rejected)
        )
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Unpaid => "unpaid",
            EntryStatus::Paid => "paid",
            EntryStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(EntryStatus::Pending),
            "unpaid" => Ok(EntryStatus::Unpaid),
            "paid" => Ok(EntryStatus::Paid),
            "rejected" => Ok(EntryStatus::Rejected),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}

/// Cost categories with their explicit expense-account mapping.
///
/// The mapping is enumerated rather than matched on keywords; the chart
/// registry validates every variant against the chart at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Material,
    Labor,
    Equipment,
    Subcontractor,
    Overhead,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Material,
        CostCategory::Labor,
        CostCategory::Equipment,
        CostCategory::Subcontractor,
        CostCategory::Overhead,
        CostCategory::Other,
    ];

    pub fn account_code(self) -> AccountCode {
        let code = match self {
            CostCategory::Material => "5101",
            CostCategory::Labor => "5102",
            CostCategory::Equipment => "5103",
            CostCategory::Subcontractor => "5104",
            CostCategory::Overhead => "5105",
            CostCategory::Other => "5109",
        };
        AccountCode::new(code)
    }
}

/// Billing categories with their revenue-account mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingCategory {
    Construction,
    Consulting,
    SoilInvestigation,
    Other,
}

impl BillingCategory {
    pub const ALL: [BillingCategory; 4] = [
        BillingCategory::Construction,
        BillingCategory::Consulting,
        BillingCategory::SoilInvestigation,
        BillingCategory::Other,
    ];

    pub fn account_code(self) -> AccountCode {
        let code = match self {
            BillingCategory::Construction => "4101",
            BillingCategory::Consulting => "4102",
            BillingCategory::SoilInvestigation => "4103",
            BillingCategory::Other => "4109",
        };
        AccountCode::new(code)
    }
}

/// Category of an entry, scoped to its kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryCategory {
    Cost(CostCategory),
    Billing(BillingCategory),
}

impl EntryCategory {
    pub fn kind(self) -> EntryKind {
        match self {
            EntryCategory::Cost(_) => EntryKind::Cost,
            EntryCategory::Billing(_) => EntryKind::Billing,
        }
    }

    /// Revenue or expense account this category posts against.
    pub fn account_code(self) -> AccountCode {
        match self {
            EntryCategory::Cost(category) => category.account_code(),
            EntryCategory::Billing(category) => category.account_code(),
        }
    }
}

/// A cost or billing record as the surrounding CRUD layer persists it.
///
/// The posting engine only ever reads these; mutation is limited to the
/// status field, driven through the journal service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryRecord {
    pub id: Uuid,
    pub kind: EntryKind,
    pub project_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: EntryCategory,
    pub description: String,
    pub status: EntryStatus,
    /// Gates whether status changes produce journal postings.
    #[serde(default = "EntryRecord::journal_default")]
    pub create_journal_entry: bool,
}

impl EntryRecord {
    pub fn new(
        kind: EntryKind,
        project_id: Uuid,
        date: NaiveDate,
        amount: Decimal,
        category: EntryCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            project_id,
            date,
            amount,
            category,
            description: description.into(),
            status: EntryStatus::Pending,
            create_journal_entry: true,
        }
    }

    /// Opts the record out of journal posting.
    pub fn without_journal(mut self) -> Self {
        self.create_journal_entry = false;
        self
    }

    pub fn journal_default() -> bool {
        true
    }
}

impl Identifiable for EntryRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Immutable audit row appended on every status transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusHistory {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub old_status: EntryStatus,
    pub new_status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl StatusHistory {
    pub fn new(
        entry_id: Uuid,
        old_status: EntryStatus,
        new_status: EntryStatus,
        changed_by: Option<&str>,
        notes: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_id,
            old_status,
            new_status,
            changed_by: changed_by.map(str::to_string),
            notes: notes.map(str::to_string),
            changed_at,
        }
    }
}
