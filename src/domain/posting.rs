use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountCode;
use crate::domain::common::{Displayable, Identifiable};
use crate::domain::record::EntryKind;

/// Which side of the book a posting falls on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }
}

/// One leg of a double-entry journal record.
///
/// Amounts are always stored positive; meaning comes from the direction plus
/// the account class. Legs are only ever created in balanced debit/credit
/// pairs and deleted together by correlation prefix, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Posting {
    pub id: Uuid,
    pub date: NaiveDate,
    pub direction: Direction,
    pub account_code: AccountCode,
    pub description: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

impl Posting {
    pub fn new(
        date: NaiveDate,
        direction: Direction,
        account_code: impl Into<AccountCode>,
        description: impl Into<String>,
        amount: Decimal,
        project_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            direction,
            account_code: account_code.into(),
            description: description.into(),
            amount,
            project_id,
        }
    }

    /// True when this posting belongs to the business record identified by
    /// `prefix` (see [`correlation_prefix`]).
    pub fn correlates_with(&self, prefix: &str) -> bool {
        self.description.starts_with(prefix)
    }
}

impl Identifiable for Posting {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Posting {
    fn display_label(&self) -> String {
        format!(
            "{} {:?} {} {}",
            self.date, self.direction, self.account_code, self.amount
        )
    }
}

/// Correlation key shared by every posting born from one business record.
///
/// The description of each posting starts with this prefix, which is how the
/// engine finds and removes a record's postings on rejection or deletion.
pub fn correlation_prefix(kind: EntryKind, id: Uuid) -> String {
    format!("{kind} #{id}:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn correlation_prefix_matches_only_its_own_postings() {
        let id = Uuid::new_v4();
        let prefix = correlation_prefix(EntryKind::Cost, id);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let ours = Posting::new(
            date,
            Direction::Debit,
            "5101",
            format!("{prefix} cement delivery"),
            dec!(250000),
            None,
        );
        let theirs = Posting::new(
            date,
            Direction::Debit,
            "5101",
            format!("{} gravel", correlation_prefix(EntryKind::Cost, Uuid::new_v4())),
            dec!(100000),
            None,
        );
        assert!(ours.correlates_with(&prefix));
        assert!(!theirs.correlates_with(&prefix));
    }

    #[test]
    fn opposite_direction_flips_both_ways() {
        assert_eq!(Direction::Debit.opposite(), Direction::Credit);
        assert_eq!(Direction::Credit.opposite(), Direction::Debit);
    }
}
