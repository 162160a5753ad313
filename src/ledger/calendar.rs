//! Pure calendar arithmetic used by the recurrence rules and the simulator.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Drops the time-of-day component of a timestamp.
pub fn truncate_to_day(moment: NaiveDateTime) -> NaiveDate {
    moment.date()
}

/// Adds `months` calendar months, clamping the day to the length of the target month.
///
/// Returns `None` only when the result leaves chrono's representable range.
pub fn add_months_safely(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.succ_opt() {
        Some(next) => next.month() != date.month(),
        None => true,
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first_next - first).num_days() as u32)
}

/// Whole days from `anchor` to `candidate`; negative when `candidate` precedes `anchor`.
pub fn days_elapsed(anchor: NaiveDate, candidate: NaiveDate) -> i64 {
    (candidate - anchor).num_days()
}

/// Whole weeks elapsed, floored (so six days before the anchor is week -1).
pub fn weeks_elapsed(anchor: NaiveDate, candidate: NaiveDate) -> i64 {
    days_elapsed(anchor, candidate).div_euclid(7)
}

/// Calendar months between the two dates, ignoring the day of month.
pub fn months_elapsed(anchor: NaiveDate, candidate: NaiveDate) -> i64 {
    let years = (candidate.year() - anchor.year()) as i64;
    years * 12 + candidate.month() as i64 - anchor.month() as i64
}

/// Calendar years between the two dates, ignoring month and day.
pub fn years_elapsed(anchor: NaiveDate, candidate: NaiveDate) -> i64 {
    (candidate.year() - anchor.year()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        assert_eq!(add_months_safely(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_months_safely(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(add_months_safely(date(2024, 3, 31), 1), Some(date(2024, 4, 30)));
        assert_eq!(add_months_safely(date(2024, 1, 15), 0), Some(date(2024, 1, 15)));
    }

    #[test]
    fn month_addition_carries_years_both_ways() {
        assert_eq!(add_months_safely(date(2024, 11, 30), 3), Some(date(2025, 2, 28)));
        assert_eq!(add_months_safely(date(2024, 3, 31), -1), Some(date(2024, 2, 29)));
        assert_eq!(add_months_safely(date(2024, 1, 10), -13), Some(date(2022, 12, 10)));
        assert_eq!(add_months_safely(date(2024, 2, 29), 12), Some(date(2025, 2, 28)));
    }

    #[test]
    fn month_addition_always_lands_in_expected_month() {
        let start = date(2023, 1, 31);
        for n in -30..30 {
            let shifted = add_months_safely(start, n).unwrap();
            let expected_index = 2023 * 12 + n;
            assert_eq!(shifted.year(), expected_index.div_euclid(12));
            assert_eq!(shifted.month0() as i32, expected_index.rem_euclid(12));
            assert!(shifted.day() <= days_in_month(shifted.year(), shifted.month()).unwrap());
        }
    }

    #[test]
    fn last_day_detection() {
        assert!(is_last_day_of_month(date(2024, 2, 29)));
        assert!(!is_last_day_of_month(date(2024, 2, 28)));
        assert!(is_last_day_of_month(date(2023, 2, 28)));
        assert!(is_last_day_of_month(date(2024, 12, 31)));
        assert_eq!(last_day_of_month(2024, 4), Some(date(2024, 4, 30)));
        assert_eq!(last_day_of_month(2024, 13), None);
    }

    #[test]
    fn truncation_is_idempotent() {
        let moment = date(2024, 5, 6).and_hms_opt(17, 45, 3).unwrap();
        let day = truncate_to_day(moment);
        assert_eq!(day, date(2024, 5, 6));
        assert_eq!(truncate_to_day(day.and_hms_opt(0, 0, 0).unwrap()), day);
    }

    #[test]
    fn elapsed_counts() {
        let anchor = date(2024, 1, 31);
        assert_eq!(days_elapsed(anchor, date(2024, 2, 1)), 1);
        assert_eq!(days_elapsed(anchor, date(2024, 1, 30)), -1);
        assert_eq!(weeks_elapsed(anchor, date(2024, 2, 6)), 0);
        assert_eq!(weeks_elapsed(anchor, date(2024, 2, 7)), 1);
        assert_eq!(weeks_elapsed(anchor, date(2024, 1, 30)), -1);
        assert_eq!(months_elapsed(anchor, date(2024, 2, 1)), 1);
        assert_eq!(months_elapsed(anchor, date(2023, 12, 31)), -1);
        assert_eq!(years_elapsed(anchor, date(2025, 1, 1)), 1);
    }
}
