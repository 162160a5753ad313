use chrono::{Datelike, NaiveDate, Weekday};

use super::{bill::TransactionClass, holidays::HolidayCalendar};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_business_day(date: NaiveDate, holidays: &HolidayCalendar) -> bool {
    !is_weekend(date) && !holidays.is_holiday(date)
}

/// Moves `date` onto a business day: income steps backward, expenses step forward.
///
/// Business days are returned unchanged, which makes the adjustment idempotent.
/// `None` means the walk ran off the representable calendar.
pub fn adjust(
    date: NaiveDate,
    class: TransactionClass,
    holidays: &HolidayCalendar,
) -> Option<NaiveDate> {
    let mut current = date;
    while !is_business_day(current, holidays) {
        current = match class {
            TransactionClass::Income => current.pred_opt()?,
            TransactionClass::Expense => current.succ_opt()?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holidays() -> HolidayCalendar {
        [date(2024, 7, 4), date(2024, 9, 2), date(2024, 12, 25)]
            .into_iter()
            .collect()
    }

    #[test]
    fn weekend_income_moves_to_friday() {
        // 2024-06-08 is a Saturday.
        let adjusted = adjust(date(2024, 6, 8), TransactionClass::Income, &holidays());
        assert_eq!(adjusted, Some(date(2024, 6, 7)));
    }

    #[test]
    fn weekend_expense_moves_to_monday() {
        let adjusted = adjust(date(2024, 6, 9), TransactionClass::Expense, &holidays());
        assert_eq!(adjusted, Some(date(2024, 6, 10)));
    }

    #[test]
    fn holiday_after_weekend_keeps_walking() {
        // Labor Day 2024 is Monday 09-02; a Saturday expense lands on Tuesday.
        let adjusted = adjust(date(2024, 8, 31), TransactionClass::Expense, &holidays());
        assert_eq!(adjusted, Some(date(2024, 9, 3)));
        let income = adjust(date(2024, 9, 2), TransactionClass::Income, &holidays());
        assert_eq!(income, Some(date(2024, 8, 30)));
    }

    #[test]
    fn business_days_are_untouched() {
        let wednesday = date(2024, 7, 3);
        for class in [TransactionClass::Income, TransactionClass::Expense] {
            assert_eq!(adjust(wednesday, class, &holidays()), Some(wednesday));
        }
    }

    #[test]
    fn adjustment_is_idempotent_and_directional() {
        let calendar = holidays();
        let mut day = date(2024, 1, 1);
        while day < date(2025, 1, 1) {
            let income = adjust(day, TransactionClass::Income, &calendar).unwrap();
            let expense = adjust(day, TransactionClass::Expense, &calendar).unwrap();
            assert!(income <= day);
            assert!(expense >= day);
            assert_eq!(adjust(income, TransactionClass::Income, &calendar), Some(income));
            assert_eq!(adjust(expense, TransactionClass::Expense, &calendar), Some(expense));
            assert!(is_business_day(income, &calendar));
            assert!(is_business_day(expense, &calendar));
            day = day.succ_opt().unwrap();
        }
    }
}
