use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, info};

use crate::{errors::Result, utils::persistence::save_json_atomic};

use super::{
    memory::{lock, TableSet},
    CriteriaStore, Record, Table, ValueMap,
};

/// [`CriteriaStore`] persisted to a single JSON document.
///
/// Every write rewrites the document through a temporary file and a rename,
/// so a crash leaves either the previous or the new contents on disk.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<TableSet>,
}

impl JsonStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            TableSet::default()
        };
        info!(path = %path.display(), "opened json store");
        Ok(Self {
            path,
            state: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write<T>(&self, apply: impl FnOnce(&mut TableSet) -> T) -> Result<T> {
        let mut tables = lock(&self.state)?;
        let mut staged = tables.clone();
        let outcome = apply(&mut staged);
        if staged != *tables {
            save_json_atomic(&staged, &self.path)?;
            *tables = staged;
        }
        Ok(outcome)
    }
}

impl CriteriaStore for JsonStore {
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
        self.write(|tables| tables.insert_one(table, values))
    }

    fn update_one(&self, table: Table, values: &ValueMap, id: i64) -> Result<Vec<Record>> {
        debug!(%table, id, columns = values.len(), "update_one");
        self.write(|tables| tables.update_one(table, values, id))
    }

    fn delete_one(&self, table: Table, id: i64) -> Result<()> {
        let removed = self.write(|tables| tables.delete_one(table, id))?;
        debug!(%table, id, removed, "delete_one");
        Ok(())
    }

    fn delete_many(&self, table: Table, criteria: &ValueMap) -> Result<()> {
        let removed = self.write(|tables| tables.delete_many(table, criteria))?;
        debug!(%table, removed, "delete_many");
        Ok(())
    }
}
