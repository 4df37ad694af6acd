#![doc(test(attr(deny(warnings))))]

//! Sitebooks is an accrual-basis accounting core for construction firms:
//! double-entry journal posting, balance aggregation, work-in-progress
//! valuation, and balance-sheet assembly over a persisted book.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Sitebooks tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
