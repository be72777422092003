//! Persistence orchestration for accounts and their time periods over a
//! [`CriteriaStore`](crate::storage::CriteriaStore).
//!
//! Multi-step writes are issued in sequence without a surrounding
//! transaction. A failure part way through (for example after the account
//! row is written but before its statement period is) is returned to the
//! caller as-is, with no compensation.

pub mod asset_account_repo;
pub mod time_period_repo;

use crate::{domain::TimePeriod, errors::Result};

pub use asset_account_repo::AssetAccountStore;
pub use time_period_repo::TimePeriodStore;

/// CRUD over accounts of one family.
pub trait AccountRepository {
    type Account;

    fn get_account(&self, account_id: i64) -> Result<Self::Account>;
    fn insert_account(&self, account: Self::Account) -> Result<Self::Account>;
    fn update_account(&self, account: &Self::Account) -> Result<Self::Account>;
    fn delete_account(&self, account: &Self::Account) -> Result<()>;
}

pub trait TimePeriodRepository: Send + Sync {
    fn get_time_period(&self, time_period_id: i64) -> Result<TimePeriod>;
    fn insert_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod>;
    fn update_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod>;
    fn delete_time_period(&self, time_period_id: i64) -> Result<()>;
}
