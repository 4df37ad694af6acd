use std::collections::BTreeMap;

use crate::domain::{Account, AccountClass, AccountCode, BillingCategory, CostCategory};
use crate::errors::{AccountingError, Result};

/// Cash and bank account settled against on payment.
pub const CASH: &str = "1101";
/// Counter-account for billings while unpaid.
pub const RECEIVABLE: &str = "1102";
/// WIP control account; excluded from aggregation because the WIP valuation
/// engine is the authoritative source for the balance sheet.
pub const WIP_CONTROL: &str = "1103";
/// Counter-account for costs while unpaid.
pub const PAYABLE: &str = "2102";
/// Revenue-side offset for WIP control adjustments.
pub const WIP_CHANGE: &str = "4901";

const FIXED_ASSET_CODE_START: &str = "1501";
const FIXED_ASSET_CODE_END: &str = "1509";

/// True for codes reserved for fixed assets and their accumulated
/// depreciation. These are excluded from the balance-sheet fold because the
/// fixed-asset register is the authoritative source for book values.
pub fn is_fixed_asset_code(code: &AccountCode) -> bool {
    let code = code.as_str();
    code >= FIXED_ASSET_CODE_START && code <= FIXED_ASSET_CODE_END
}

/// True for codes the balance-sheet fold skips entirely. The WIP control
/// account and its income offset are mirrored from the valuation at assembly
/// time; fixed-asset codes come from the register.
pub fn is_reserved_code(code: &AccountCode) -> bool {
    code.as_str() == WIP_CONTROL || code.as_str() == WIP_CHANGE || is_fixed_asset_code(code)
}

/// The fixed, pre-classified chart of accounts every new book is seeded with.
pub fn default_chart() -> Vec<Account> {
    use AccountClass::*;
    vec![
        Account::new(CASH, "Cash and Bank", Asset).with_group("Cash", "Operating"),
        Account::new(RECEIVABLE, "Accounts Receivable", Asset)
            .with_group("Receivables", "Trade"),
        Account::new(WIP_CONTROL, "Work In Progress", Asset).with_group("Projects", "WIP"),
        Account::new("1108", "Allowance for Doubtful Accounts", ContraAsset)
            .with_group("Receivables", "Trade"),
        Account::new("1201", "Prepaid Expenses", Asset).with_group("Prepayments", "Operating"),
        Account::new("1301", "Long-term Deposits", Asset)
            .with_group("Deposits", "Guarantees")
            .non_current(),
        Account::new("1501", "Heavy Equipment", FixedAsset).with_group("Fixed Assets", "Equipment"),
        Account::new("1502", "Vehicles", FixedAsset).with_group("Fixed Assets", "Vehicles"),
        Account::new("1503", "Buildings", FixedAsset).with_group("Fixed Assets", "Property"),
        Account::new("1509", "Accumulated Depreciation", ContraAsset)
            .with_group("Fixed Assets", "Depreciation"),
        Account::new(PAYABLE, "Accounts Payable", Liability).with_group("Payables", "Trade"),
        Account::new("2103", "Advances from Customers", Liability)
            .with_group("Payables", "Advances"),
        Account::new("2201", "Bank Loans", Liability)
            .with_group("Loans", "Bank")
            .non_current(),
        Account::new("3101", "Share Capital", Equity).with_group("Equity", "Capital"),
        Account::new("3102", "Retained Earnings", Equity).with_group("Equity", "Retained"),
        Account::new("4101", "Construction Revenue", Revenue).with_group("Revenue", "Projects"),
        Account::new("4102", "Consulting Revenue", Revenue).with_group("Revenue", "Services"),
        Account::new("4103", "Soil Investigation Revenue", Revenue)
            .with_group("Revenue", "Services"),
        Account::new("4109", "Other Revenue", Revenue).with_group("Revenue", "Other"),
        Account::new(WIP_CHANGE, "Change in Work In Progress", Revenue)
            .with_group("Revenue", "WIP"),
        Account::new("5101", "Material Expense", Expense).with_group("Project Costs", "Material"),
        Account::new("5102", "Labor Expense", Expense).with_group("Project Costs", "Labor"),
        Account::new("5103", "Equipment Rental Expense", Expense)
            .with_group("Project Costs", "Equipment"),
        Account::new("5104", "Subcontractor Expense", Expense)
            .with_group("Project Costs", "Subcontract"),
        Account::new("5105", "Overhead Expense", Expense).with_group("Project Costs", "Overhead"),
        Account::new("5109", "Other Project Expense", Expense)
            .with_group("Project Costs", "Other"),
    ]
}

/// Validated view over a book's chart.
///
/// Built before any posting runs: duplicate codes and category mappings that
/// point at missing or misclassified accounts fail fast here instead of
/// surfacing as silent misposts later.
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    by_code: BTreeMap<AccountCode, Account>,
}

impl ChartRegistry {
    pub fn validate(accounts: &[Account]) -> Result<Self> {
        let mut by_code = BTreeMap::new();
        for account in accounts {
            if by_code
                .insert(account.code.clone(), account.clone())
                .is_some()
            {
                return Err(AccountingError::DuplicateAccountCode(
                    account.code.to_string(),
                ));
            }
        }
        let registry = Self { by_code };

        for category in CostCategory::ALL {
            let account = registry
                .by_code
                .get(&category.account_code())
                .ok_or_else(|| AccountingError::UnmappedCategory(format!("{category:?}")))?;
            if account.class != AccountClass::Expense {
                return Err(AccountingError::UnmappedCategory(format!(
                    "{category:?} maps to non-expense account {}",
                    account.code
                )));
            }
        }
        for category in BillingCategory::ALL {
            let account = registry
                .by_code
                .get(&category.account_code())
                .ok_or_else(|| AccountingError::UnmappedCategory(format!("{category:?}")))?;
            if account.class != AccountClass::Revenue {
                return Err(AccountingError::UnmappedCategory(format!(
                    "{category:?} maps to non-revenue account {}",
                    account.code
                )));
            }
        }
        for fixed in [CASH, RECEIVABLE, WIP_CONTROL, PAYABLE, WIP_CHANGE] {
            registry.require(&AccountCode::new(fixed))?;
        }
        Ok(registry)
    }

    pub fn account(&self, code: &AccountCode) -> Option<&Account> {
        self.by_code.get(code)
    }

    pub fn require(&self, code: &AccountCode) -> Result<&Account> {
        self.account(code)
            .ok_or_else(|| AccountingError::AccountNotFound(code.to_string()))
    }
}
