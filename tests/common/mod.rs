#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use ploutos_core::{
    config::ConfigManager,
    domain::{PeriodMethod, PeriodType, TimePeriod},
    repositories::{TimePeriodRepository, TimePeriodStore},
    storage::{CriteriaStore, MemoryStore, Record, Table, ValueMap},
    Result,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager rooted in a fresh directory and opens the JSON
/// store it describes.
pub fn setup_json_env() -> (Arc<dyn CriteriaStore>, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager = ConfigManager::with_base_dir(base).expect("create config manager");
    let store = config_manager
        .load()
        .expect("load config")
        .open_store()
        .expect("open json store");
    (store, config_manager)
}

/// Opens the configured store again, as a new process would.
pub fn reopen(config_manager: &ConfigManager) -> Arc<dyn CriteriaStore> {
    config_manager
        .load()
        .expect("load config")
        .open_store()
        .expect("reopen json store")
}

/// One round trip made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    GetOne(Table, i64),
    GetMany(Table, ValueMap),
    InsertOne(Table, ValueMap),
    UpdateOne(Table, ValueMap, i64),
    DeleteOne(Table, i64),
    DeleteMany(Table, ValueMap),
}

/// Wraps a [`MemoryStore`] and logs every call in order. Inserts into tables
/// registered with [`RecordingStore::reject_inserts`] return no rows.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
    rejected: Mutex<HashSet<Table>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject_inserts(&self, table: Table) {
        self.rejected.lock().expect("lock rejected").insert(table);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("lock calls").clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock calls").clear();
    }

    pub fn count(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn row_count(&self, table: Table) -> usize {
        self.inner.row_count(table).expect("row count")
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("lock calls").push(call);
    }
}

impl CriteriaStore for RecordingStore {
    fn get_one(&self, table: Table, id: i64) -> Result<Vec<Record>> {
        self.record(StoreCall::GetOne(table, id));
        self.inner.get_one(table, id)
    }

    fn get_many(&self, table: Table, criteria: &ValueMap) -> Result<Vec<Record>> {
        self.record(StoreCall::GetMany(table, criteria.clone()));
        self.inner.get_many(table, criteria)
    }

    fn insert_one(&self, table: Table, values: &ValueMap) -> Result<Vec<Record>> {
        self.record(StoreCall::InsertOne(table, values.clone()));
        if self.rejected.lock().expect("lock rejected").contains(&table) {
            return Ok(Vec::new());
        }
        self.inner.insert_one(table, values)
    }

    fn update_one(&self, table: Table, values: &ValueMap, id: i64) -> Result<Vec<Record>> {
        self.record(StoreCall::UpdateOne(table, values.clone(), id));
        self.inner.update_one(table, values, id)
    }

    fn delete_one(&self, table: Table, id: i64) -> Result<()> {
        self.record(StoreCall::DeleteOne(table, id));
        self.inner.delete_one(table, id)
    }

    fn delete_many(&self, table: Table, criteria: &ValueMap) -> Result<()> {
        self.record(StoreCall::DeleteMany(table, criteria.clone()));
        self.inner.delete_many(table, criteria)
    }
}

/// Delegates to a real [`TimePeriodStore`] and counts calls by id.
pub struct CountingTimePeriods {
    inner: TimePeriodStore,
    pub gets: Mutex<Vec<i64>>,
    pub inserts: Mutex<Vec<TimePeriod>>,
    pub deletes: Mutex<Vec<i64>>,
}

impl CountingTimePeriods {
    pub fn new(store: Arc<dyn CriteriaStore>) -> Arc<Self> {
        Arc::new(Self {
            inner: TimePeriodStore::new(store),
            gets: Mutex::new(Vec::new()),
            inserts: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        })
    }

    pub fn deleted_ids(&self) -> Vec<i64> {
        self.deletes.lock().expect("lock deletes").clone()
    }

    pub fn fetched_ids(&self) -> Vec<i64> {
        self.gets.lock().expect("lock gets").clone()
    }
}

impl TimePeriodRepository for CountingTimePeriods {
    fn get_time_period(&self, time_period_id: i64) -> Result<TimePeriod> {
        self.gets.lock().expect("lock gets").push(time_period_id);
        self.inner.get_time_period(time_period_id)
    }

    fn insert_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod> {
        self.inserts
            .lock()
            .expect("lock inserts")
            .push(time_period.clone());
        self.inner.insert_time_period(time_period)
    }

    fn update_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod> {
        self.inner.update_time_period(time_period)
    }

    fn delete_time_period(&self, time_period_id: i64) -> Result<()> {
        self.deletes.lock().expect("lock deletes").push(time_period_id);
        self.inner.delete_time_period(time_period_id)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The biweekly payday schedule owned by account 1.
pub fn biweekly_payday() -> TimePeriod {
    TimePeriod::new("Biweekly Payday")
        .with_last_occurrence(date(2018, 1, 1))
        .with_recurrence(PeriodMethod::EveryXUnits, PeriodType::Week, 2)
        .with_owner(1)
}

pub fn monthly_statement(name: &str) -> TimePeriod {
    TimePeriod::new(name)
        .with_last_occurrence(date(2024, 1, 25))
        .with_recurrence(PeriodMethod::SameXofUnit, PeriodType::Month, 25)
}
