use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

/// A construction project, the aggregation key for WIP valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub contract_value: Decimal,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        contract_value: Decimal,
        status: ProjectStatus,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            contract_value,
            status,
            start_date,
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Project {
    fn display_label(&self) -> String {
        format!("{} ({:?})", self.name, self.status)
    }
}

/// A fixed asset consumed read-only by the balance-sheet assembler.
///
/// Depreciation posting is an external collaborator; the engine only derives
/// the book value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedAsset {
    pub id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub accumulated_depreciation: Decimal,
    pub acquired_on: NaiveDate,
}

impl FixedAsset {
    pub fn new(name: impl Into<String>, value: Decimal, acquired_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value,
            accumulated_depreciation: Decimal::ZERO,
            acquired_on,
        }
    }

    pub fn with_depreciation(mut self, accumulated: Decimal) -> Self {
        self.accumulated_depreciation = accumulated;
        self
    }

    pub fn book_value(&self) -> Decimal {
        self.value - self.accumulated_depreciation
    }
}

impl Identifiable for FixedAsset {
    fn id(&self) -> Uuid {
        self.id
    }
}
