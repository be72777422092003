use std::result::Result as StdResult;

use thiserror::Error;

use crate::{domain::account::AccountType, storage::Table};

/// Error type shared by the repositories, stores, and configuration layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Account {id} of type {account_type} not found.")]
    AccountNotFound { id: i64, account_type: AccountType },
    #[error("TimePeriod {0} not found.")]
    TimePeriodNotFound(i64),
    #[error("New TimePeriod '{name}' for AccountId {owner_account_id} failed to return after insert.")]
    TimePeriodInsertFailed { name: String, owner_account_id: i64 },
    #[error("New account '{name}' failed to return after insert.")]
    AccountInsertFailed { name: String },
    #[error("Invalid {table} record, column `{column}`: {reason}")]
    InvalidRecord {
        table: Table,
        column: &'static str,
        reason: String,
    },
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, RepoError>;

impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Storage(err.to_string())
    }
}
