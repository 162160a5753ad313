//! Day-by-day balance simulation over a projection window.
//!
//! The engine is synchronous and does no I/O: every call builds its own
//! accumulator and returns the complete event list, upcoming table and
//! balance extremes in one [`ProjectionResult`].

pub mod types;

pub use types::{
    BalanceSummary, DailyBalance, EventChannel, LedgerEvent, ProjectionResult, ProjectionWindow,
    UpcomingRow,
};

use chrono::NaiveDate;

use crate::{
    currency::{describe_amount, format_currency, CurrencyCode},
    ledger::{adjust, BillDefinition, HolidayCalendar, ProjectionIssue, RecurrenceEvaluator},
};

/// Projects balances for one window against one holiday calendar.
#[derive(Debug, Clone)]
pub struct ProjectionEngine<'a> {
    window: ProjectionWindow,
    holidays: &'a HolidayCalendar,
    currency: CurrencyCode,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(window: ProjectionWindow, holidays: &'a HolidayCalendar) -> Self {
        Self {
            window,
            holidays,
            currency: CurrencyCode::default(),
        }
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn window(&self) -> ProjectionWindow {
        self.window
    }

    /// Runs the simulation. Bills due on day 0 are listed but leave the opening balance as is.
    pub fn project(&self, opening_balance: f64, bills: &[BillDefinition]) -> ProjectionResult {
        let evaluator = RecurrenceEvaluator::new(self.holidays);
        let mut run = Accumulator::new(self.window, opening_balance);

        for (index, current) in self.window.days() {
            for bill in bills {
                if !evaluator.occurs_on(bill, current) {
                    continue;
                }
                let Some(effective) = adjust(current, bill.class(), self.holidays) else {
                    run.issues.push(ProjectionIssue::InvalidAdjustedDate {
                        bill: bill.name.clone(),
                        date: current,
                    });
                    continue;
                };
                run.record_occurrence(
                    bill,
                    effective,
                    describe_amount(&bill.name, bill.amount, &self.currency),
                );
                if index != 0 {
                    run.balance += bill.amount;
                }
            }
            let label = if index == 0 {
                "Balance"
            } else {
                "Projected Balance"
            };
            let description = format!("{}: {}", label, format_currency(run.balance, &self.currency));
            run.close_day(current, description);
        }

        run.finish()
    }
}

struct Accumulator {
    window: ProjectionWindow,
    opening_balance: f64,
    balance: f64,
    events: Vec<LedgerEvent>,
    upcoming: Vec<UpcomingRow>,
    daily_balances: Vec<DailyBalance>,
    lowest: (f64, NaiveDate),
    highest: (f64, NaiveDate),
    issues: Vec<ProjectionIssue>,
}

impl Accumulator {
    fn new(window: ProjectionWindow, opening_balance: f64) -> Self {
        let capacity = window.duration_days as usize;
        Self {
            window,
            opening_balance,
            balance: opening_balance,
            events: Vec::with_capacity(capacity * 2),
            upcoming: Vec::new(),
            daily_balances: Vec::with_capacity(capacity),
            lowest: (opening_balance, window.start_date),
            highest: (opening_balance, window.start_date),
            issues: Vec::new(),
        }
    }

    fn record_occurrence(&mut self, bill: &BillDefinition, date: NaiveDate, description: String) {
        self.events.push(LedgerEvent::bill(description, date));
        self.upcoming.push(UpcomingRow {
            name: bill.name.clone(),
            amount: bill.amount,
            balance_after: self.balance,
            date,
            frequency: bill.frequency.label().to_string(),
            category: bill.category.clone(),
        });
    }

    fn close_day(&mut self, date: NaiveDate, description: String) {
        self.events.push(LedgerEvent::balance(description, date));
        self.daily_balances.push(DailyBalance {
            date,
            balance: self.balance,
        });
        if self.balance < self.lowest.0 {
            self.lowest = (self.balance, date);
        }
        if self.balance > self.highest.0 {
            self.highest = (self.balance, date);
        }
    }

    fn finish(self) -> ProjectionResult {
        ProjectionResult {
            window: self.window,
            opening_balance: self.opening_balance,
            events: self.events,
            upcoming: self.upcoming,
            daily_balances: self.daily_balances,
            lowest_balance: self.lowest.0,
            lowest_balance_date: self.lowest.1,
            highest_balance: self.highest.0,
            highest_balance_date: self.highest.1,
            issues: self.issues,
        }
    }
}
