//! Date arithmetic for [`TimePeriod`] recurrence descriptors.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::time_period::{PeriodMethod, PeriodType, TimePeriod};

impl TimePeriod {
    /// First date after `last_occurrence` on which the period recurs.
    ///
    /// Returns `None` when `period_value` is zero or the result falls outside
    /// the representable calendar.
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        next_after(
            self.last_occurrence,
            self.period_method,
            self.period_type,
            self.period_value,
        )
    }

    /// Every occurrence after `last_occurrence` up to and including `until`.
    pub fn occurrences_through(&self, until: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut cursor = self.last_occurrence;
        while let Some(next) = next_after(
            cursor,
            self.period_method,
            self.period_type,
            self.period_value,
        ) {
            if next > until {
                break;
            }
            dates.push(next);
            cursor = next;
        }
        dates
    }
}

fn next_after(
    from: NaiveDate,
    method: PeriodMethod,
    unit: PeriodType,
    value: u32,
) -> Option<NaiveDate> {
    if value == 0 {
        return None;
    }
    match method {
        PeriodMethod::EveryXUnits => every_x_units(from, unit, value),
        PeriodMethod::SameXofUnit => {
            let start = unit_start(from, unit)?;
            let candidate = nth_day_of_unit(start, unit, value)?;
            if candidate > from {
                Some(candidate)
            } else {
                nth_day_of_unit(next_unit_start(start, unit)?, unit, value)
            }
        }
    }
}

fn every_x_units(from: NaiveDate, unit: PeriodType, value: u32) -> Option<NaiveDate> {
    let value = i32::try_from(value).ok()?;
    match unit {
        PeriodType::Day => from.checked_add_signed(Duration::days(value.into())),
        PeriodType::Week => from.checked_add_signed(Duration::weeks(value.into())),
        PeriodType::Month => shift_month(from, value),
        PeriodType::Quarter => shift_month(from, value.checked_mul(3)?),
        PeriodType::Year => shift_year(from, value),
    }
}

fn unit_start(date: NaiveDate, unit: PeriodType) -> Option<NaiveDate> {
    match unit {
        PeriodType::Day => Some(date),
        PeriodType::Week => {
            let delta = i64::from(date.weekday().num_days_from_monday());
            date.checked_sub_signed(Duration::days(delta))
        }
        PeriodType::Month => date.with_day(1),
        PeriodType::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), month, 1)
        }
        PeriodType::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
    }
}

fn next_unit_start(start: NaiveDate, unit: PeriodType) -> Option<NaiveDate> {
    match unit {
        PeriodType::Day => start.checked_add_signed(Duration::days(1)),
        PeriodType::Week => start.checked_add_signed(Duration::weeks(1)),
        PeriodType::Month => shift_month(start, 1),
        PeriodType::Quarter => shift_month(start, 3),
        PeriodType::Year => shift_year(start, 1),
    }
}

/// The `value`-th day of the unit beginning at `start`, clamped to the
/// unit's last day.
fn nth_day_of_unit(start: NaiveDate, unit: PeriodType, value: u32) -> Option<NaiveDate> {
    let length = match unit {
        PeriodType::Day => 1,
        PeriodType::Week => 7,
        _ => (next_unit_start(start, unit)? - start).num_days(),
    };
    let offset = i64::from(value).min(length) - 1;
    start.checked_add_signed(Duration::days(offset))
}

fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::try_from(date.month0()).ok()?)?
        .checked_add(months)?;
    let year = index.div_euclid(12);
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_next.pred_opt()?.day())
}
