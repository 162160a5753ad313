#![doc(test(attr(deny(warnings))))]

//! Forecast Core projects a bank balance forward, day by day, over a set of
//! recurring bills, moving each occurrence onto a business day and tracking
//! the lowest and highest balance reached.
//!
//! The projection engine in [`simulation`] is pure and synchronous. Reading
//! bills, fetching holidays and the opening balance, and publishing calendars,
//! tables and alerts live in [`storage`] and are wired together by
//! [`core::services::ForecastService`].

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod simulation;
pub mod storage;
pub mod utils;

pub use config::{ConfigManager, ForecastConfig, HolidayProvider};
pub use errors::{ForecastError, Result};
pub use ledger::{BillDefinition, BillRow, Frequency, HolidayCalendar, ProjectionIssue};
pub use simulation::{ProjectionEngine, ProjectionResult, ProjectionWindow};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Forecast Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
