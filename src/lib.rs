#![doc(test(attr(deny(warnings))))]

//! Ploutos Core maps personal-finance accounts and their recurring time
//! periods onto a generic criteria-addressed table store.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ploutos_core::{
//!     domain::{AssetAccount, TimePeriod},
//!     repositories::{AccountRepository, AssetAccountStore},
//!     rust_decimal::Decimal,
//!     storage::MemoryStore,
//! };
//!
//! let accounts = AssetAccountStore::new(Arc::new(MemoryStore::new()));
//! let card = AssetAccount::credit("Visa", Decimal::new(500, 0), Decimal::new(1000, 0), Decimal::new(45, 3))
//!     .with_statement_time_period(TimePeriod::new("Statement"));
//! let saved = accounts.insert_account(card).unwrap();
//! assert_eq!(saved.statement_time_period().unwrap().owner_account_id, saved.id);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod storage;
pub mod utils;

pub use chrono;
pub use rust_decimal;

pub use errors::{RepoError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ploutos Core tracing initialized.");
    });
}

/// Like [`init`], using `config.log_filter` as the default directive.
/// Whichever of the two runs first decides the filter.
pub fn init_with(config: &config::Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing_with(&config.log_filter);
        tracing::info!(filter = %config.log_filter, "Ploutos Core tracing initialized.");
    });
}
