use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{RepoError, Result};

use super::{CriteriaStore, Record, Row, Table, Value, ValueMap};

/// Rows of every table plus the id counters, shared by the in-memory and JSON
/// backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub(crate) struct TableSet {
    #[serde(default)]
    accounts: Vec<Row>,
    #[serde(default)]
    time_periods: Vec<Row>,
    #[serde(default)]
    account_time_period_links: Vec<Row>,
    #[serde(default)]
    last_account_id: i64,
    #[serde(default)]
    last_time_period_id: i64,
}

impl TableSet {
    fn rows(&self, table: Table) -> &Vec<Row> {
        match table {
            Table::Account => &self.accounts,
            Table::TimePeriod => &self.time_periods,
            Table::AccountToTimePeriodLink => &self.account_time_period_links,
        }
    }

    fn rows_mut(&mut self, table: Table) -> &mut Vec<Row> {
        match table {
            Table::Account => &mut self.accounts,
            Table::TimePeriod => &mut self.time_periods,
            Table::AccountToTimePeriodLink => &mut self.account_time_period_links,
        }
    }

    fn next_id(&mut self, table: Table) -> Option<i64> {
        let counter = match table {
            Table::Account => &mut self.last_account_id,
            Table::TimePeriod => &mut self.last_time_period_id,
            Table::AccountToTimePeriodLink => return None,
        };
        *counter += 1;
        Some(*counter)
    }

    pub(crate) fn get_one(&self, table: Table, id: i64) -> Vec<Record> {
        let Some(id_column) = table.id_column() else {
            return Vec::new();
        };
        self.rows(table)
            .iter()
            .find(|row| has_id(row, id_column, id))
            .map(|row| vec![Record::new(table, row.clone())])
            .unwrap_or_default()
    }

    pub(crate) fn get_many(&self, table: Table, criteria: &ValueMap) -> Vec<Record> {
        self.rows(table)
            .iter()
            .filter(|row| matches_criteria(row, criteria))
            .map(|row| Record::new(table, row.clone()))
            .collect()
    }

    pub(crate) fn insert_one(&mut self, table: Table, values: &ValueMap) -> Vec<Record> {
        let mut row: Row = values
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();
        if let (Some(id_column), Some(id)) = (table.id_column(), self.next_id(table)) {
            row.insert(id_column.to_string(), Value::Integer(id));
        }
        self.rows_mut(table).push(row.clone());
        vec![Record::new(table, row)]
    }

    pub(crate) fn update_one(&mut self, table: Table, values: &ValueMap, id: i64) -> Vec<Record> {
        let Some(id_column) = table.id_column() else {
            return Vec::new();
        };
        let Some(row) = self
            .rows_mut(table)
            .iter_mut()
            .find(|row| has_id(row, id_column, id))
        else {
            return Vec::new();
        };
        for (column, value) in values.iter() {
            if column != id_column {
                row.insert(column.to_string(), value.clone());
            }
        }
        vec![Record::new(table, row.clone())]
    }

    /// Returns the number of rows removed.
    pub(crate) fn delete_one(&mut self, table: Table, id: i64) -> usize {
        let Some(id_column) = table.id_column() else {
            return 0;
        };
        let rows = self.rows_mut(table);
        let before = rows.len();
        rows.retain(|row| !has_id(row, id_column, id));
        before - rows.len()
    }

    pub(crate) fn delete_many(&mut self, table: Table, criteria: &ValueMap) -> usize {
        let rows = self.rows_mut(table);
        let before = rows.len();
        rows.retain(|row| !matches_criteria(row, criteria));
        before - rows.len()
    }
}

fn has_id(row: &Row, id_column: &str, id: i64) -> bool {
    matches!(row.get(id_column), Some(Value::Integer(value)) if *value == id)
}

fn matches_criteria(row: &Row, criteria: &ValueMap) -> bool {
    criteria
        .iter()
        .all(|(column, expected)| row.get(column) == Some(expected))
}

pub(crate) fn lock(state: &Mutex<TableSet>) -> Result<MutexGuard<'_, TableSet>> {
    state
        .lock()
        .map_err(|_| RepoError::Storage("table store lock poisoned".into()))
}

/// Process-local [`CriteriaStore`]. Ids start at 1 per table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<TableSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`.
    pub fn row_count(&self, table: Table) -> Result<usize> {
        Ok(lock(&self.state)?.rows(table).len())
    }
}

impl CriteriaStore for MemoryStore {
    fn get_one(&self, table: Table, id: i64) -> Result<Vec<Record>> {
        debug!(%table, id, "get_one");
        Ok(lock(&self.state)?.get_one(table, id))
    }

    fn get_many(&self, table: Table, criteria: &ValueMap) -> Result<Vec<Record>> {
        debug!(%table, criteria = criteria.len(), "get_many");
        Ok(lock(&self.state)?.get_many(table, criteria))
    }

    fn insert_one(&self, table: Table, values: &ValueMap) -> Result<Vec<Record>> {
        debug!(%table, columns = values.len(), "insert_one");
        Ok(lock(&self.state)?.insert_one(table, values))
    }

    fn update_one(&self, table: Table, values: &ValueMap, id: i64) -> Result<Vec<Record>> {
        debug!(%table, id, columns = values.len(), "update_one");
        Ok(lock(&self.state)?.update_one(table, values, id))
    }

    fn delete_one(&self, table: Table, id: i64) -> Result<()> {
        let removed = lock(&self.state)?.delete_one(table, id);
        debug!(%table, id, removed, "delete_one");
        Ok(())
    }

    fn delete_many(&self, table: Table, criteria: &ValueMap) -> Result<()> {
        let removed = lock(&self.state)?.delete_many(table, criteria);
        debug!(%table, removed, "delete_many");
        Ok(())
    }
}
