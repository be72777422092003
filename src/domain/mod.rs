pub mod account;
pub mod common;
pub mod link_diff;
pub mod schedule;
pub mod time_period;

pub use account::{AccountType, AssetAccount, AssetAccountKind, AssetAccountType, CreditTerms, SavingsTerms};
pub use link_diff::LinkDiff;
pub use time_period::{PeriodMethod, PeriodType, TimePeriod};
