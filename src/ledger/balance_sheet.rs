//! Balance-sheet assembly.
//!
//! Pure composition of the balance aggregator, the fixed-asset register, and
//! the WIP valuation into a hierarchically grouped report. Never persists
//! state and never fails on an unbalanced result: `is_balanced` is a
//! data-quality signal for the caller, not an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{AccountClass, AccountCode};
use crate::ledger::aggregate::aggregate_balances;
use crate::ledger::book::Book;
use crate::ledger::chart::is_reserved_code;
use crate::ledger::wip::{valuate_wip, ProjectWip};

const GROUP_FALLBACK: &str = "Other";

/// Reconciliation tolerance: one cent of the currency unit.
pub fn default_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

/// One account line of the report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetLine {
    pub code: AccountCode,
    pub name: String,
    pub amount: Decimal,
}

/// Lines grouped category -> subcategory for display, with a running total.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSection {
    pub groups: BTreeMap<String, BTreeMap<String, Vec<SheetLine>>>,
    pub total: Decimal,
}

impl GroupedSection {
    fn push(&mut self, category: Option<&str>, subcategory: Option<&str>, line: SheetLine) {
        self.total += line.amount;
        self.groups
            .entry(category.unwrap_or(GROUP_FALLBACK).to_string())
            .or_default()
            .entry(subcategory.unwrap_or(GROUP_FALLBACK).to_string())
            .or_default()
            .push(line);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedAssetLine {
    pub id: Uuid,
    pub name: String,
    pub value: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetsSection {
    pub current: GroupedSection,
    pub non_current: GroupedSection,
    /// Contra-asset lines; amounts are non-positive.
    pub contra: Vec<SheetLine>,
    pub fixed_assets: Vec<FixedAssetLine>,
    pub work_in_progress: Vec<ProjectWip>,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LiabilitiesSection {
    pub current: GroupedSection,
    pub non_current: GroupedSection,
    /// Synthetic "Advances from Customers (Negative WIP)" line.
    pub negative_wip: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EquitySection {
    pub lines: Vec<SheetLine>,
    pub total: Decimal,
    pub net_income: Decimal,
    pub total_with_income: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetSummary {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub net_income: Decimal,
    pub total_equity_with_income: Decimal,
    pub total_liabilities_and_equity: Decimal,
    pub difference: Decimal,
    pub is_balanced: bool,
    pub total_fixed_assets: Decimal,
    pub total_wip: Decimal,
    pub total_negative_wip: Decimal,
    pub total_contra_assets: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub date: NaiveDate,
    pub assets: AssetsSection,
    pub liabilities: LiabilitiesSection,
    pub equity: EquitySection,
    pub summary: BalanceSheetSummary,
}

/// Assembles the balance sheet as of `as_of` with the default tolerance.
pub fn assemble(book: &Book, as_of: NaiveDate) -> BalanceSheet {
    assemble_with_epsilon(book, as_of, default_epsilon())
}

pub fn assemble_with_epsilon(book: &Book, as_of: NaiveDate, epsilon: Decimal) -> BalanceSheet {
    let balances = aggregate_balances(book, as_of);
    let wip = valuate_wip(book, as_of);

    let mut assets = AssetsSection::default();
    let mut liabilities = LiabilitiesSection::default();
    let mut equity = EquitySection::default();
    let mut revenue_total = Decimal::ZERO;
    let mut expense_total = Decimal::ZERO;
    let mut total_contra_assets = Decimal::ZERO;

    for balance in balances.values() {
        // Fixed-asset codes, the WIP control account, and its income offset
        // are excluded: the fixed-asset register and the WIP valuation are
        // authoritative for those figures at every cutoff.
        if is_reserved_code(&balance.code) {
            continue;
        }
        let account = match book.account(&balance.code) {
            Some(account) => account,
            None => continue,
        };
        let line = SheetLine {
            code: balance.code.clone(),
            name: balance.name.clone(),
            amount: balance.balance,
        };
        match balance.class {
            AccountClass::Asset | AccountClass::FixedAsset => {
                if !line.amount.is_zero() {
                    let bucket = if account.current_asset() {
                        &mut assets.current
                    } else {
                        &mut assets.non_current
                    };
                    bucket.push(account.category.as_deref(), account.subcategory.as_deref(), line);
                }
            }
            AccountClass::ContraAsset => {
                total_contra_assets += balance.balance;
                if !line.amount.is_zero() {
                    assets.contra.push(line);
                }
            }
            AccountClass::Liability => {
                if !line.amount.is_zero() {
                    let bucket = if account.current_liability() {
                        &mut liabilities.current
                    } else {
                        &mut liabilities.non_current
                    };
                    bucket.push(account.category.as_deref(), account.subcategory.as_deref(), line);
                }
            }
            AccountClass::Equity => {
                equity.total += balance.balance;
                if !line.amount.is_zero() {
                    equity.lines.push(line);
                }
            }
            AccountClass::Revenue => revenue_total += balance.balance,
            AccountClass::Expense => {
                // Expense magnitude is debit-normal for the income figure.
                expense_total += balance.debit_total - balance.credit_total;
            }
        }
    }

    let mut total_fixed_assets = Decimal::ZERO;
    for asset in &book.fixed_assets {
        let book_value = asset.book_value();
        total_fixed_assets += book_value;
        assets.fixed_assets.push(FixedAssetLine {
            id: asset.id,
            name: asset.name.clone(),
            value: asset.value,
            accumulated_depreciation: asset.accumulated_depreciation,
            book_value,
        });
    }

    assets.work_in_progress = wip.rows.clone();
    liabilities.negative_wip = wip.total_negative_wip;

    assets.total = assets.current.total
        + assets.non_current.total
        + total_fixed_assets
        + wip.total_wip
        + total_contra_assets;
    liabilities.total =
        liabilities.current.total + liabilities.non_current.total + wip.total_negative_wip;

    // The change-in-WIP income component comes from the as-of valuation, not
    // from the posted 4901 offset: the adjustment pair reflects the current
    // book state and carries one date, so a cutoff between entry dates would
    // see the valuation asset without its income counterpart.
    let net_income =
        revenue_total - expense_total + wip.total_wip - wip.total_negative_wip;
    equity.net_income = net_income;
    equity.total_with_income = equity.total + net_income;

    let total_liabilities_and_equity = liabilities.total + equity.total_with_income;
    let difference = assets.total - total_liabilities_and_equity;
    let is_balanced = difference.abs() < epsilon;
    if !is_balanced {
        debug!(%difference, %as_of, "balance sheet does not reconcile");
    }

    let summary = BalanceSheetSummary {
        total_assets: assets.total,
        total_liabilities: liabilities.total,
        total_equity: equity.total,
        net_income,
        total_equity_with_income: equity.total_with_income,
        total_liabilities_and_equity,
        difference,
        is_balanced,
        total_fixed_assets,
        total_wip: wip.total_wip,
        total_negative_wip: wip.total_negative_wip,
        total_contra_assets,
    };

    BalanceSheet {
        date: as_of,
        assets,
        liabilities,
        equity,
        summary,
    }
}

/// Summary figures compared across two report dates.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeFigures {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity_with_income: Decimal,
    pub net_income: Decimal,
    pub total_wip: Decimal,
    pub total_negative_wip: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeBalanceSheet {
    pub current: BalanceSheet,
    pub previous: BalanceSheet,
    pub changes: ComparativeFigures,
    pub percent_changes: ComparativeFigures,
}

/// Runs the assembly for two dates and derives deltas and percent changes.
/// A zero prior-period figure yields 0% rather than failing.
pub fn assemble_comparative(
    book: &Book,
    current_date: NaiveDate,
    previous_date: NaiveDate,
) -> ComparativeBalanceSheet {
    let current = assemble(book, current_date);
    let previous = assemble(book, previous_date);
    let changes = ComparativeFigures {
        total_assets: current.summary.total_assets - previous.summary.total_assets,
        total_liabilities: current.summary.total_liabilities - previous.summary.total_liabilities,
        total_equity_with_income: current.summary.total_equity_with_income
            - previous.summary.total_equity_with_income,
        net_income: current.summary.net_income - previous.summary.net_income,
        total_wip: current.summary.total_wip - previous.summary.total_wip,
        total_negative_wip: current.summary.total_negative_wip
            - previous.summary.total_negative_wip,
    };
    let percent_changes = ComparativeFigures {
        total_assets: percent(current.summary.total_assets, previous.summary.total_assets),
        total_liabilities: percent(
            current.summary.total_liabilities,
            previous.summary.total_liabilities,
        ),
        total_equity_with_income: percent(
            current.summary.total_equity_with_income,
            previous.summary.total_equity_with_income,
        ),
        net_income: percent(current.summary.net_income, previous.summary.net_income),
        total_wip: percent(current.summary.total_wip, previous.summary.total_wip),
        total_negative_wip: percent(
            current.summary.total_negative_wip,
            previous.summary.total_negative_wip,
        ),
    };
    ComparativeBalanceSheet {
        current,
        previous,
        changes,
        percent_changes,
    }
}

fn percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        Decimal::ZERO
    } else {
        (current - previous) / previous * Decimal::ONE_HUNDRED
    }
}
