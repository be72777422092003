use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{common::StoredCode, link_diff::LinkDiff};

/// How `period_value` is read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PeriodMethod {
    /// Recur every `period_value` units after the last occurrence.
    EveryXUnits = 0,
    /// Recur on the `period_value`-th day of each unit.
    SameXofUnit = 1,
}

impl StoredCode for PeriodMethod {
    const ALL: &'static [Self] = &[Self::EveryXUnits, Self::SameXofUnit];

    fn code(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PeriodType {
    Day = 0,
    Week = 1,
    Month = 2,
    Quarter = 3,
    Year = 4,
}

impl StoredCode for PeriodType {
    const ALL: &'static [Self] = &[
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    fn code(self) -> i64 {
        self as i64
    }
}

/// A recurring schedule owned by one account and optionally linked to others.
///
/// Only the owning account may edit the schedule itself. Other accounts
/// subscribe through `linked_accounts`, which never contains the owner.
///
/// The entity remembers the linked ids it was loaded with (the baseline) so
/// that later edits to `linked_accounts` can be turned into link-table inserts
/// and deletes. The baseline is captured once; see
/// [`TimePeriod::establish_initial_linked_accounts`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimePeriod {
    pub id: i64,
    pub name: String,
    pub last_occurrence: NaiveDate,
    pub period_method: PeriodMethod,
    pub period_type: PeriodType,
    pub period_value: u32,
    pub owner_account_id: i64,
    #[serde(default)]
    pub linked_accounts: Vec<i64>,
    #[serde(skip)]
    baseline: Vec<i64>,
}

impl TimePeriod {
    /// Creates an unsaved monthly schedule anchored on the Unix epoch. Use the
    /// builder methods to describe the actual recurrence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            last_occurrence: NaiveDate::default(),
            period_method: PeriodMethod::EveryXUnits,
            period_type: PeriodType::Month,
            period_value: 1,
            owner_account_id: 0,
            linked_accounts: Vec::new(),
            baseline: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_recurrence(
        mut self,
        method: PeriodMethod,
        period_type: PeriodType,
        value: u32,
    ) -> Self {
        self.period_method = method;
        self.period_type = period_type;
        self.period_value = value;
        self
    }

    pub fn with_last_occurrence(mut self, date: NaiveDate) -> Self {
        self.last_occurrence = date;
        self
    }

    pub fn with_owner(mut self, account_id: i64) -> Self {
        self.owner_account_id = account_id;
        self
    }

    pub fn with_linked_accounts(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.linked_accounts.extend(ids);
        self
    }

    /// Merges `ids` into both the linked list and the baseline, skipping
    /// duplicates.
    ///
    /// Only takes effect while the baseline is empty. Once a baseline has been
    /// captured, later calls are silently ignored, even with a different set.
    pub fn establish_initial_linked_accounts(&mut self, ids: &[i64]) {
        if !self.baseline.is_empty() {
            return;
        }
        for &id in ids {
            if !self.baseline.contains(&id) {
                self.baseline.push(id);
            }
            if !self.linked_accounts.contains(&id) {
                self.linked_accounts.push(id);
            }
        }
    }

    pub fn baseline(&self) -> &[i64] {
        &self.baseline
    }

    pub fn link_diff(&self) -> LinkDiff {
        LinkDiff::between(&self.baseline, &self.linked_accounts)
    }

    pub fn newly_added_accounts(&self) -> Vec<i64> {
        self.link_diff().added
    }

    pub fn newly_deleted_accounts(&self) -> Vec<i64> {
        self.link_diff().removed
    }

    pub fn unmodified_accounts(&self) -> Vec<i64> {
        self.link_diff().unmodified
    }
}
