use chrono::{Datelike, NaiveDate};

use crate::utils::time::days_in_month;

use super::{config::WeekdaySet, entities::MonthKey, error::TrackerError};

/// Returns days of `month` in ascending order whose weekday is in `weekdays`.
pub fn tracked_days(month: MonthKey, weekdays: &WeekdaySet) -> Result<Vec<u32>, TrackerError> {
    let last_day = days_in_month(month.year, month.month)
        .ok_or_else(|| TrackerError::InvalidDate(month.to_string()))?;

    let days = (1..=last_day)
        .filter_map(|day| NaiveDate::from_ymd_opt(month.year, month.month, day))
        .filter(|date| weekdays.contains(date.weekday()))
        .map(|date| date.day())
        .collect();
    Ok(days)
}
