use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::{AppError, AppResult};

pub fn validate_month(month: i32) -> AppResult<()> {
    if !(0..=11).contains(&month) {
        return Err(AppError::ValidationError(format!(
            "Month must be between 0 and 11, got {month}"
        )));
    }
    Ok(())
}

/// Inclusive UTC bounds of a zero-indexed month:
/// first day 00:00:00 through last day 23:59:59.
pub fn month_bounds(month: i32, year: i32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    validate_month(month)?;
    let invalid = || AppError::ValidationError(format!("Invalid period {year}-{month}"));

    let first = NaiveDate::from_ymd_opt(year, month as u32 + 1, 1).ok_or_else(invalid)?;
    let next_first = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month as u32 + 2, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    let start = first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc();
    let end = last.and_hms_opt(23, 59, 59).ok_or_else(invalid)?.and_utc();
    Ok((start, end))
}

/// Zero-indexed month and year of a timestamp.
pub fn period_of(at: DateTime<Utc>) -> (i32, i32) {
    (at.month0() as i32, at.year())
}

/// Document id of a monthly rollup row.
pub fn monthly_points_key(year: i32, month: i32, user_id: i64) -> String {
    format!("{year}-{month}-{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_bounds_june() {
        let (start, end) = month_bounds(5, 2024).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_month_bounds_february_leap_year() {
        let (_, end) = month_bounds(1, 2024).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
        let (_, end) = month_bounds(1, 2023).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2023, 2, 28, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_month_bounds_december() {
        let (start, end) = month_bounds(11, 2024).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_month_out_of_range() {
        assert!(month_bounds(12, 2024).is_err());
        assert!(month_bounds(-1, 2024).is_err());
    }

    #[test]
    fn test_monthly_points_key() {
        assert_eq!(monthly_points_key(2024, 5, 42), "2024-5-42");
        assert_eq!(monthly_points_key(2024, 0, 7), "2024-0-7");
    }

    #[test]
    fn test_period_of() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(period_of(at), (0, 2024));
    }
}
