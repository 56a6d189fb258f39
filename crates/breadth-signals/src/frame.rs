//! Conversions between calendar dates and polars `Date` columns.

use crate::error::{Result, SignalError};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// `num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, the physical representation of a polars `Date`.
pub(crate) fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub(crate) fn from_epoch_days(days: i32) -> Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
        .ok_or(SignalError::DateOutOfRange(days))
}

/// Build a `Date` column named `name`.
pub(crate) fn date_column(
    name: &str,
    dates: impl Iterator<Item = NaiveDate>,
) -> PolarsResult<Column> {
    let days: Vec<i32> = dates.map(to_epoch_days).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?.into())
}

/// Read a `Date` column back as calendar dates.
pub(crate) fn read_dates(frame: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let physical = frame.column(name)?.cast(&DataType::Int32)?;
    physical
        .i32()?
        .into_iter()
        .map(|days| {
            days.ok_or_else(|| PolarsError::ComputeError(format!("null in {name}").into()))
                .map_err(SignalError::from)
                .and_then(from_epoch_days)
        })
        .collect()
}
