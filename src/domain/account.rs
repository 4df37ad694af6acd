use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::common::Displayable;

/// Classifies an account for posting polarity and balance-sheet placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AccountClass {
    Revenue,
    Expense,
    Asset,
    FixedAsset,
    ContraAsset,
    Liability,
    Equity,
}

impl AccountClass {
    /// Debit-normal classes: a debit posting increases the aggregated balance.
    /// Every other class is credit-normal.
    pub fn is_debit_normal(self) -> bool {
        matches!(
            self,
            AccountClass::Asset | AccountClass::FixedAsset | AccountClass::ContraAsset
        )
    }
}

/// Fixed-width numeric account code, e.g. `1101` for Cash and Bank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountCode(String);

impl AccountCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// One row of the chart of accounts.
///
/// The chart is fixed and pre-classified: accounts are created by
/// administrative tooling, never by the posting engine. The nullable
/// current-asset/current-liability flags default to current when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub code: AccountCode,
    pub name: String,
    pub class: AccountClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current_asset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current_liability: Option<bool>,
}

impl Account {
    pub fn new(code: impl Into<AccountCode>, name: impl Into<String>, class: AccountClass) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            class,
            category: None,
            subcategory: None,
            is_current_asset: None,
            is_current_liability: None,
        }
    }

    /// Assigns the cashflow grouping labels used for balance-sheet display.
    pub fn with_group(mut self, category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Marks the account as non-current on both sides of the sheet.
    pub fn non_current(mut self) -> Self {
        self.is_current_asset = Some(false);
        self.is_current_liability = Some(false);
        self
    }

    pub fn current_asset(&self) -> bool {
        self.is_current_asset.unwrap_or(true)
    }

    pub fn current_liability(&self) -> bool {
        self.is_current_liability.unwrap_or(true)
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} {} ({:?})", self.code, self.name, self.class)
    }
}
