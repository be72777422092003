pub mod json_backend;
pub mod memory;

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::common::StoredCode,
    errors::{RepoError, Result},
};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Tables reachable through a [`CriteriaStore`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Account,
    TimePeriod,
    AccountToTimePeriodLink,
}

impl Table {
    /// Column holding the store-assigned key. The link table has none.
    pub fn id_column(self) -> Option<&'static str> {
        match self {
            Table::Account => Some(AccountColumn::Id.as_str()),
            Table::TimePeriod => Some(TimePeriodColumn::Id.as_str()),
            Table::AccountToTimePeriodLink => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Table::Account => "Account",
            Table::TimePeriod => "TimePeriod",
            Table::AccountToTimePeriodLink => "AccountToTimePeriodLink",
        };
        f.write_str(label)
    }
}

/// A column of a specific table. Column names only enter a [`ValueMap`] or
/// leave a [`Record`] through implementors of this trait.
pub trait Column: Copy {
    const TABLE: Table;

    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountColumn {
    Id,
    Name,
    AccountType,
    AssetAccountType,
    Balance,
    CreditLine,
    InterestRate,
    /// Legacy statement reference. Ownership is read from
    /// `TimePeriod.OwnerAccountId`; nothing writes this column.
    TimePeriodId,
}

impl Column for AccountColumn {
    const TABLE: Table = Table::Account;

    fn as_str(self) -> &'static str {
        match self {
            AccountColumn::Id => "Id",
            AccountColumn::Name => "Name",
            AccountColumn::AccountType => "Type",
            AccountColumn::AssetAccountType => "SubType",
            AccountColumn::Balance => "Balance",
            AccountColumn::CreditLine => "Limit",
            AccountColumn::InterestRate => "Rate",
            AccountColumn::TimePeriodId => "TimePeriodId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriodColumn {
    Id,
    Name,
    LastOccurrence,
    PeriodMethod,
    PeriodType,
    PeriodValue,
    OwnerAccountId,
}

impl Column for TimePeriodColumn {
    const TABLE: Table = Table::TimePeriod;

    fn as_str(self) -> &'static str {
        match self {
            TimePeriodColumn::Id => "Id",
            TimePeriodColumn::Name => "Name",
            TimePeriodColumn::LastOccurrence => "LastOccurance",
            TimePeriodColumn::PeriodMethod => "PeriodMethod",
            TimePeriodColumn::PeriodType => "PeriodType",
            TimePeriodColumn::PeriodValue => "PeriodValue",
            TimePeriodColumn::OwnerAccountId => "OwnerAccountId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkColumn {
    AccountId,
    TimePeriodId,
}

impl Column for LinkColumn {
    const TABLE: Table = Table::AccountToTimePeriodLink;

    fn as_str(self) -> &'static str {
        match self {
            LinkColumn::AccountId => "AccountId",
            LinkColumn::TimePeriodId => "TimePeriodId",
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Null,
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// Ordered column-to-value pairs. Used as insert/update payload and as
/// AND-combined equality criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(&'static str, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column`, replacing any earlier value for it.
    pub fn with<C: Column>(mut self, column: C, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set<C: Column>(&mut self, column: C, value: impl Into<Value>) {
        let name = column.as_str();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

pub type Row = BTreeMap<String, Value>;

/// A row returned by the store, tagged with the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: Table,
    values: Row,
}

impl Record {
    pub fn new(table: Table, values: Row) -> Self {
        Self { table, values }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn raw(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    fn value<C: Column>(&self, column: C) -> Result<&Value> {
        self.values
            .get(column.as_str())
            .ok_or_else(|| self.invalid(column, "missing column".into()))
    }

    fn invalid<C: Column>(&self, column: C, reason: String) -> RepoError {
        RepoError::InvalidRecord {
            table: self.table,
            column: column.as_str(),
            reason,
        }
    }

    pub fn integer<C: Column>(&self, column: C) -> Result<i64> {
        match self.value(column)? {
            Value::Integer(value) => Ok(*value),
            Value::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| self.invalid(column, format!("`{raw}` is not an integer"))),
            other => Err(self.invalid(column, format!("expected integer, found {other:?}"))),
        }
    }

    pub fn decimal<C: Column>(&self, column: C) -> Result<Decimal> {
        match self.value(column)? {
            Value::Decimal(value) => Ok(*value),
            Value::Integer(value) => Ok(Decimal::from(*value)),
            Value::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| self.invalid(column, format!("`{raw}` is not a decimal"))),
            other => Err(self.invalid(column, format!("expected decimal, found {other:?}"))),
        }
    }

    pub fn text<C: Column>(&self, column: C) -> Result<String> {
        match self.value(column)? {
            Value::Text(value) => Ok(value.clone()),
            other => Err(self.invalid(column, format!("expected text, found {other:?}"))),
        }
    }

    pub fn date<C: Column>(&self, column: C) -> Result<NaiveDate> {
        match self.value(column)? {
            Value::Date(value) => Ok(*value),
            Value::Text(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| self.invalid(column, format!("`{raw}` is not a date"))),
            other => Err(self.invalid(column, format!("expected date, found {other:?}"))),
        }
    }

    /// Reads an integer column holding a [`StoredCode`] enum.
    pub fn code<T: StoredCode, C: Column>(&self, column: C) -> Result<T> {
        let raw = self.integer(column)?;
        T::from_code(raw).ok_or_else(|| self.invalid(column, format!("unknown code {raw}")))
    }
}

/// Abstract table store addressed by [`Table`] plus either a numeric key or a
/// set of equality criteria.
///
/// Writes confirm by returning the affected row; an empty result means the
/// write did not happen. Deletes are idempotent.
pub trait CriteriaStore: Send + Sync {
    /// Zero or one row keyed by `id`.
    fn get_one(&self, table: Table, id: i64) -> Result<Vec<Record>>;
    fn get_many(&self, table: Table, criteria: &ValueMap) -> Result<Vec<Record>>;
    /// Returns the inserted row, including its generated id.
    fn insert_one(&self, table: Table, values: &ValueMap) -> Result<Vec<Record>>;
    /// Returns the updated row, or nothing when `id` does not exist.
    fn update_one(&self, table: Table, values: &ValueMap, id: i64) -> Result<Vec<Record>>;
    fn delete_one(&self, table: Table, id: i64) -> Result<()>;
    fn delete_many(&self, table: Table, criteria: &ValueMap) -> Result<()>;
}
