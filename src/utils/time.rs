use chrono::NaiveDate;

/// Number of days in a month of the proleptic Gregorian calendar. Returns [None] for a month
/// outside of 1..=12 or a year chrono can't represent.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::days_in_month;

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
    }

    #[test]
    fn test_days_in_month_regular() {
        assert_eq!(days_in_month(2024, 1), Some(31));
        assert_eq!(days_in_month(2024, 6), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
    }

    #[test]
    fn test_days_in_month_invalid() {
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
    }
}
