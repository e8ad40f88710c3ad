use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Days before a self-managed invoice falls due.
pub const INVOICE_DUE_DAYS: i64 = 14;

/// Adds calendar months keeping the day-of-month. A day past the end of the
/// target month rolls over into the next one (Jan 31 + 1 month = Mar 3 in a
/// non-leap year). Time of day is preserved.
pub fn add_months_rolling(from: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let total_months = from.month0() + months;
    let year = from.year() + i32::try_from(total_months / 12).ok()?;
    let month = total_months % 12 + 1;

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first_of_month.checked_add_signed(Duration::days(i64::from(from.day()) - 1))?;

    Some(date.and_time(from.time()).and_utc())
}

pub fn invoice_due_date(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::days(INVOICE_DUE_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 30, 15).unwrap()
    }

    #[test]
    fn plain_month_add_keeps_day_and_time() {
        assert_eq!(add_months_rolling(at(2025, 3, 15), 1), Some(at(2025, 4, 15)));
    }

    #[test]
    fn overflowing_day_rolls_into_next_month() {
        assert_eq!(add_months_rolling(at(2025, 1, 31), 1), Some(at(2025, 3, 3)));
        assert_eq!(add_months_rolling(at(2024, 1, 31), 1), Some(at(2024, 3, 2)));
        assert_eq!(add_months_rolling(at(2025, 3, 31), 1), Some(at(2025, 5, 1)));
    }

    #[test]
    fn december_wraps_into_next_year() {
        assert_eq!(add_months_rolling(at(2025, 12, 10), 1), Some(at(2026, 1, 10)));
        assert_eq!(add_months_rolling(at(2025, 6, 1), 12), Some(at(2026, 6, 1)));
    }

    #[test]
    fn due_date_is_two_weeks_out() {
        assert_eq!(invoice_due_date(at(2025, 2, 20)), at(2025, 3, 6));
    }
}
