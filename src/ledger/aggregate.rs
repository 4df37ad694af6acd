//! Balance aggregation: a pure fold of postings into per-account balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Account, AccountClass, AccountCode, Direction};
use crate::ledger::book::Book;

/// Aggregated balance of one account as of a report date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountBalance {
    pub code: AccountCode,
    pub name: String,
    pub class: AccountClass,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    /// Signed balance under the class polarity rule.
    pub balance: Decimal,
}

impl AccountBalance {
    fn zero(account: &Account) -> Self {
        Self {
            code: account.code.clone(),
            name: account.name.clone(),
            class: account.class,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }
}

/// Folds every posting dated on or before `as_of` into per-account balances.
///
/// Debit-normal classes (asset, fixedAsset, contraAsset) grow with debits;
/// everything else grows with credits. After the fold, contra-asset accounts
/// are forced non-positive regardless of how their postings summed.
///
/// The fold is deterministic and stateless: the same book and cutoff always
/// produce the same map. Postings against codes absent from the chart are
/// skipped (the chart registry prevents the engine from creating them).
pub fn aggregate_balances(book: &Book, as_of: NaiveDate) -> BTreeMap<AccountCode, AccountBalance> {
    let mut balances: BTreeMap<AccountCode, AccountBalance> = book
        .accounts
        .iter()
        .map(|account| (account.code.clone(), AccountBalance::zero(account)))
        .collect();

    for posting in book.postings.iter().filter(|posting| posting.date <= as_of) {
        let Some(slot) = balances.get_mut(&posting.account_code) else {
            continue;
        };
        match posting.direction {
            Direction::Debit => slot.debit_total += posting.amount,
            Direction::Credit => slot.credit_total += posting.amount,
        }
        slot.balance = if slot.class.is_debit_normal() {
            slot.debit_total - slot.credit_total
        } else {
            slot.credit_total - slot.debit_total
        };
    }

    for slot in balances.values_mut() {
        if slot.class == AccountClass::ContraAsset {
            slot.balance = -slot.balance.abs();
        }
    }

    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Posting;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(book: &mut Book, code: &str, direction: Direction, amount: Decimal, on: NaiveDate) {
        book.postings.push(Posting::new(
            on,
            direction,
            code,
            format!("Cost #{}: test leg", uuid::Uuid::new_v4()),
            amount,
            None,
        ));
    }

    #[test]
    fn debit_increases_assets_and_credit_increases_liabilities() {
        let mut book = Book::new("Polarity");
        let on = date(2024, 1, 10);
        post(&mut book, "1101", Direction::Debit, dec!(1000), on);
        post(&mut book, "2102", Direction::Credit, dec!(1000), on);

        let balances = aggregate_balances(&book, on);
        assert_eq!(balances[&AccountCode::new("1101")].balance, dec!(1000));
        assert_eq!(balances[&AccountCode::new("2102")].balance, dec!(1000));
    }

    #[test]
    fn postings_after_the_cutoff_are_ignored() {
        let mut book = Book::new("Cutoff");
        post(&mut book, "1101", Direction::Debit, dec!(500), date(2024, 2, 1));
        post(&mut book, "1101", Direction::Debit, dec!(700), date(2024, 5, 1));

        let balances = aggregate_balances(&book, date(2024, 3, 1));
        assert_eq!(balances[&AccountCode::new("1101")].balance, dec!(500));
    }

    #[test]
    fn contra_assets_never_report_positive() {
        let mut book = Book::new("Contra");
        let on = date(2024, 1, 10);
        // A debit would normally push a debit-normal account positive.
        post(&mut book, "1108", Direction::Debit, dec!(250), on);

        let balances = aggregate_balances(&book, on);
        assert_eq!(balances[&AccountCode::new("1108")].balance, dec!(-250));
    }

    #[test]
    fn every_chart_account_is_present_even_with_no_postings() {
        let book = Book::new("Zeroes");
        let balances = aggregate_balances(&book, date(2024, 1, 1));
        assert_eq!(balances.len(), book.accounts.len());
        assert!(balances.values().all(|slot| slot.balance.is_zero()));
    }
}
