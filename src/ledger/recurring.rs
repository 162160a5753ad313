//! Decides whether a bill occurs on a given day.
//!
//! Interval classes (`one-time`, `days`, `weeks`) match their nominal dates; the
//! simulator moves the resulting entry onto a business day afterwards. Calendar
//! classes (`months`, `years`) compute the nominal date of a period, adjust it
//! for weekends and holidays, and match the adjusted date, so their occurrence
//! is recorded on the day money actually moves.

use chrono::{Datelike, NaiveDate};

use super::{
    bill::{BillDefinition, Frequency},
    business_day::adjust,
    calendar::{
        add_months_safely, days_elapsed, is_last_day_of_month, last_day_of_month, months_elapsed,
        weeks_elapsed, years_elapsed,
    },
    holidays::HolidayCalendar,
};

/// Recurrence rules evaluated against one holiday calendar.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceEvaluator<'a> {
    holidays: &'a HolidayCalendar,
}

impl<'a> RecurrenceEvaluator<'a> {
    pub fn new(holidays: &'a HolidayCalendar) -> Self {
        Self { holidays }
    }

    pub fn occurs_on(&self, bill: &BillDefinition, candidate: NaiveDate) -> bool {
        let interval = i64::from(bill.repeat_interval.max(1));
        match &bill.frequency {
            Frequency::OneTime => candidate == bill.start_date,
            Frequency::Days => {
                let days = days_elapsed(bill.start_date, candidate);
                days >= 0 && bill.is_active_on(candidate) && days % interval == 0
            }
            Frequency::Weeks => {
                let weeks = weeks_elapsed(bill.start_date, candidate);
                weeks >= 0
                    && bill.is_active_on(candidate)
                    && weeks % interval == 0
                    && candidate.weekday() == bill.start_date.weekday()
            }
            Frequency::Months => self.matches_adjusted_period(
                bill,
                candidate,
                months_elapsed(bill.start_date, candidate),
                |period| monthly_nominal(bill.start_date, period),
            ),
            Frequency::Years => self.matches_adjusted_period(
                bill,
                candidate,
                years_elapsed(bill.start_date, candidate),
                |period| yearly_nominal(bill.start_date, period),
            ),
            Frequency::Unknown(_) => false,
        }
    }

    /// Checks the candidate's own period and both neighbours, because adjustment can
    /// carry an occurrence across a month or year boundary.
    fn matches_adjusted_period(
        &self,
        bill: &BillDefinition,
        candidate: NaiveDate,
        period: i64,
        nominal: impl Fn(i64) -> Option<NaiveDate>,
    ) -> bool {
        if !bill.is_active_on(candidate) {
            return false;
        }
        let interval = i64::from(bill.repeat_interval.max(1));
        let class = bill.class();
        (period - 1..=period + 1)
            .filter(|p| *p >= 0 && p % interval == 0)
            .filter_map(nominal)
            .filter_map(|date| adjust(date, class, self.holidays))
            .any(|adjusted| adjusted == candidate)
    }
}

/// Month-end anchors follow month ends; other anchors keep their day, clamped.
fn monthly_nominal(start: NaiveDate, period: i64) -> Option<NaiveDate> {
    let shifted = add_months_safely(start, i32::try_from(period).ok()?)?;
    if is_last_day_of_month(start) {
        last_day_of_month(shifted.year(), shifted.month())
    } else {
        Some(shifted)
    }
}

/// Same month and day each year; Feb 29 anchors fall on Feb 28 in common years.
fn yearly_nominal(start: NaiveDate, period: i64) -> Option<NaiveDate> {
    let months = i32::try_from(period.checked_mul(12)?).ok()?;
    add_months_safely(start, months)
}
