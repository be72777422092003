use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{common::StoredCode, TimePeriod},
    errors::{RepoError, Result},
    storage::{Column, CriteriaStore, LinkColumn, Record, Table, TimePeriodColumn, ValueMap},
};

use super::TimePeriodRepository;

/// [`TimePeriodRepository`] backed by the `TimePeriod` and
/// `AccountToTimePeriodLink` tables.
#[derive(Clone)]
pub struct TimePeriodStore {
    store: Arc<dyn CriteriaStore>,
}

impl TimePeriodStore {
    pub fn new(store: Arc<dyn CriteriaStore>) -> Self {
        Self { store }
    }

    /// Writes the difference between the period's baseline and its current
    /// `linked_accounts` to the link table, then re-reads the membership.
    ///
    /// [`TimePeriodRepository::update_time_period`] never touches links; this
    /// is the operation that does.
    pub fn sync_linked_accounts(&self, time_period: &TimePeriod) -> Result<TimePeriod> {
        let mut saved = self.get_basic(time_period.id)?;
        let diff = time_period.link_diff();
        for account_id in diff.added {
            if account_id == saved.owner_account_id {
                warn!(time_period = saved.id, account_id, "owner cannot be linked; skipped");
                continue;
            }
            self.insert_link(saved.id, account_id)?;
        }
        for account_id in diff.removed {
            let criteria = ValueMap::new()
                .with(LinkColumn::AccountId, account_id)
                .with(LinkColumn::TimePeriodId, saved.id);
            self.store
                .delete_many(Table::AccountToTimePeriodLink, &criteria)?;
        }
        self.load_linked_accounts(&mut saved)?;
        Ok(saved)
    }

    fn get_basic(&self, time_period_id: i64) -> Result<TimePeriod> {
        let rows = self.store.get_one(Table::TimePeriod, time_period_id)?;
        let record = rows
            .first()
            .ok_or(RepoError::TimePeriodNotFound(time_period_id))?;
        map_time_period(record)
    }

    fn load_linked_accounts(&self, time_period: &mut TimePeriod) -> Result<()> {
        let criteria = ValueMap::new().with(LinkColumn::TimePeriodId, time_period.id);
        let rows = self
            .store
            .get_many(Table::AccountToTimePeriodLink, &criteria)?;
        let mut linked = Vec::with_capacity(rows.len());
        for row in &rows {
            let account_id = row.integer(LinkColumn::AccountId)?;
            if account_id != time_period.owner_account_id {
                linked.push(account_id);
            }
        }
        time_period.establish_initial_linked_accounts(&linked);
        Ok(())
    }

    /// Returns the account id echoed back by the store, if the row was
    /// confirmed.
    fn insert_link(&self, time_period_id: i64, account_id: i64) -> Result<Option<i64>> {
        let values = ValueMap::new()
            .with(LinkColumn::AccountId, account_id)
            .with(LinkColumn::TimePeriodId, time_period_id);
        let rows = self
            .store
            .insert_one(Table::AccountToTimePeriodLink, &values)?;
        match rows.first() {
            Some(row) => Ok(Some(row.integer(LinkColumn::AccountId)?)),
            None => {
                warn!(time_period_id, account_id, "link insert was not confirmed");
                Ok(None)
            }
        }
    }
}

impl TimePeriodRepository for TimePeriodStore {
    fn get_time_period(&self, time_period_id: i64) -> Result<TimePeriod> {
        let mut time_period = self.get_basic(time_period_id)?;
        self.load_linked_accounts(&mut time_period)?;
        Ok(time_period)
    }

    fn insert_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod> {
        let rows = self
            .store
            .insert_one(Table::TimePeriod, &time_period_values(time_period))?;
        let record = rows
            .first()
            .ok_or_else(|| RepoError::TimePeriodInsertFailed {
                name: time_period.name.clone(),
                owner_account_id: time_period.owner_account_id,
            })?;
        let mut saved = map_time_period(record)?;

        let mut confirmed = Vec::new();
        for account_id in time_period.newly_added_accounts() {
            if account_id == saved.owner_account_id {
                warn!(time_period = saved.id, account_id, "owner cannot be linked; skipped");
                continue;
            }
            if let Some(linked) = self.insert_link(saved.id, account_id)? {
                confirmed.push(linked);
            }
        }
        saved.establish_initial_linked_accounts(&confirmed);

        info!(
            time_period = saved.id,
            owner = saved.owner_account_id,
            links = confirmed.len(),
            "inserted time period"
        );
        Ok(saved)
    }

    fn update_time_period(&self, time_period: &TimePeriod) -> Result<TimePeriod> {
        let rows = self.store.update_one(
            Table::TimePeriod,
            &time_period_values(time_period),
            time_period.id,
        )?;
        let record = rows
            .first()
            .ok_or(RepoError::TimePeriodNotFound(time_period.id))?;
        let mut saved = map_time_period(record)?;
        self.load_linked_accounts(&mut saved)?;

        if !time_period.link_diff().is_empty() {
            warn!(
                time_period = time_period.id,
                "linked account edits are not written by update; use sync_linked_accounts"
            );
        }
        Ok(saved)
    }

    fn delete_time_period(&self, time_period_id: i64) -> Result<()> {
        // Links go first; a link row must never outlive its period.
        let criteria = ValueMap::new().with(LinkColumn::TimePeriodId, time_period_id);
        self.store
            .delete_many(Table::AccountToTimePeriodLink, &criteria)?;
        self.store.delete_one(Table::TimePeriod, time_period_id)?;
        info!(time_period = time_period_id, "deleted time period");
        Ok(())
    }
}

fn time_period_values(time_period: &TimePeriod) -> ValueMap {
    ValueMap::new()
        .with(TimePeriodColumn::Name, time_period.name.as_str())
        .with(TimePeriodColumn::LastOccurrence, time_period.last_occurrence)
        .with(TimePeriodColumn::PeriodMethod, time_period.period_method.code())
        .with(TimePeriodColumn::PeriodType, time_period.period_type.code())
        .with(TimePeriodColumn::PeriodValue, time_period.period_value)
        .with(
            TimePeriodColumn::OwnerAccountId,
            time_period.owner_account_id,
        )
}

fn map_time_period(record: &Record) -> Result<TimePeriod> {
    let raw_value = record.integer(TimePeriodColumn::PeriodValue)?;
    let period_value = u32::try_from(raw_value).map_err(|_| RepoError::InvalidRecord {
        table: record.table(),
        column: TimePeriodColumn::PeriodValue.as_str(),
        reason: format!("{raw_value} is out of range"),
    })?;

    Ok(TimePeriod::new(record.text(TimePeriodColumn::Name)?)
        .with_id(record.integer(TimePeriodColumn::Id)?)
        .with_last_occurrence(record.date(TimePeriodColumn::LastOccurrence)?)
        .with_recurrence(
            record.code(TimePeriodColumn::PeriodMethod)?,
            record.code(TimePeriodColumn::PeriodType)?,
            period_value,
        )
        .with_owner(record.integer(TimePeriodColumn::OwnerAccountId)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PeriodMethod, PeriodType},
        storage::MemoryStore,
    };
    use chrono::NaiveDate;

    fn payday() -> TimePeriod {
        TimePeriod::new("Biweekly Payday")
            .with_last_occurrence(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())
            .with_recurrence(PeriodMethod::EveryXUnits, PeriodType::Week, 2)
            .with_owner(1)
    }

    #[test]
    fn payload_has_six_columns_and_no_id() {
        let values = time_period_values(&payday().with_id(11));
        assert_eq!(values.len(), 6);
        assert!(values.get("Id").is_none());
    }

    #[test]
    fn mapping_rejects_negative_period_values() {
        let store = MemoryStore::new();
        let values = time_period_values(&payday()).with(TimePeriodColumn::PeriodValue, -3i64);
        let rows = store.insert_one(Table::TimePeriod, &values).unwrap();
        let err = map_time_period(&rows[0]).unwrap_err();
        assert!(matches!(err, RepoError::InvalidRecord { column: "PeriodValue", .. }));
    }

    #[test]
    fn sync_writes_additions_and_removals() {
        let repo = TimePeriodStore::new(Arc::new(MemoryStore::new()));
        let saved = repo
            .insert_time_period(&payday().with_linked_accounts([2, 3]))
            .unwrap();

        let mut edited = saved.clone();
        edited.linked_accounts.retain(|&id| id != 2);
        edited.linked_accounts.push(4);
        let synced = repo.sync_linked_accounts(&edited).unwrap();

        assert_eq!(synced.linked_accounts, vec![3, 4]);
        assert!(synced.link_diff().is_empty());
        assert_eq!(
            repo.get_time_period(saved.id).unwrap().linked_accounts,
            vec![3, 4]
        );
    }

    #[test]
    fn sync_of_missing_period_fails() {
        let repo = TimePeriodStore::new(Arc::new(MemoryStore::new()));
        let err = repo.sync_linked_accounts(&payday().with_id(5)).unwrap_err();
        assert!(matches!(err, RepoError::TimePeriodNotFound(5)));
    }
}
