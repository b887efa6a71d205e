#![doc(test(attr(deny(warnings))))]

//! Loan Tracker classifies loan payments as on time, late, defaulted or
//! unpaid, and provides the formatting, sorting and form validation helpers
//! used to present loans in tables.

pub mod cli;
pub mod config;
pub mod currency;
pub mod dates;
pub mod errors;
pub mod forms;
pub mod loans;
pub mod sorting;
pub mod utils;

use std::sync::Once;

pub use errors::LoanError;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing at the default level and emits a startup log.
pub fn init() {
    init_with(&config::Config::default());
}

/// Initializes global tracing using the configured log level.
pub fn init_with(config: &config::Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(&config.log_directive());
        tracing::info!(environment = %config.environment, "Loan Tracker tracing initialized.");
    });
}
