use std::ops::RangeInclusive;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::ProjectionIssue;

/// Contiguous run of days to simulate, starting at `start_date` (day index 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionWindow {
    pub start_date: NaiveDate,
    pub duration_days: u32,
}

impl ProjectionWindow {
    pub fn new(start_date: NaiveDate, duration_days: u32) -> Self {
        Self {
            start_date,
            duration_days,
        }
    }

    pub fn day(&self, index: u32) -> Option<NaiveDate> {
        if index >= self.duration_days {
            return None;
        }
        self.start_date.checked_add_days(Days::new(u64::from(index)))
    }

    /// `(index, date)` for every simulated day.
    pub fn days(&self) -> impl Iterator<Item = (u32, NaiveDate)> + '_ {
        (0..self.duration_days).map_while(|index| self.day(index).map(|date| (index, date)))
    }

    /// The day right after the window, `start_date + duration_days`.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(u64::from(self.duration_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Calendar years whose holidays matter, from the first day through `end_date`.
    pub fn years_touched(&self) -> RangeInclusive<i32> {
        self.start_date.year()..=self.end_date().year()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventChannel {
    Bill,
    Balance,
}

impl EventChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventChannel::Bill => "bill",
            EventChannel::Balance => "balance",
        }
    }
}

/// An all-day calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub channel: EventChannel,
    pub description: String,
    pub date: NaiveDate,
}

impl LedgerEvent {
    pub fn bill(description: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            channel: EventChannel::Bill,
            description: description.into(),
            date,
        }
    }

    pub fn balance(description: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            channel: EventChannel::Balance,
            description: description.into(),
            date,
        }
    }
}

/// One projected occurrence as written to the upcoming-transactions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingRow {
    pub name: String,
    pub amount: f64,
    /// Running balance when the occurrence is recorded, before its own amount lands.
    pub balance_after: f64,
    pub date: NaiveDate,
    pub frequency: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: f64,
}

/// The four scalars written next to the upcoming table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub lowest_balance: f64,
    pub lowest_balance_date: NaiveDate,
    pub highest_balance: f64,
    pub highest_balance_date: NaiveDate,
}

impl BalanceSummary {
    /// Balances rounded to whole units, the way the summary table shows them.
    pub fn rounded(&self) -> Self {
        Self {
            lowest_balance: crate::currency::round_half_up(self.lowest_balance),
            highest_balance: crate::currency::round_half_up(self.highest_balance),
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub window: ProjectionWindow,
    pub opening_balance: f64,
    pub events: Vec<LedgerEvent>,
    pub upcoming: Vec<UpcomingRow>,
    pub daily_balances: Vec<DailyBalance>,
    pub lowest_balance: f64,
    pub lowest_balance_date: NaiveDate,
    pub highest_balance: f64,
    pub highest_balance_date: NaiveDate,
    #[serde(default)]
    pub issues: Vec<ProjectionIssue>,
}

impl ProjectionResult {
    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary {
            lowest_balance: self.lowest_balance,
            lowest_balance_date: self.lowest_balance_date,
            highest_balance: self.highest_balance,
            highest_balance_date: self.highest_balance_date,
        }
    }

    pub fn closing_balance(&self) -> f64 {
        self.daily_balances
            .last()
            .map(|day| day.balance)
            .unwrap_or(self.opening_balance)
    }

    pub fn events_on(&self, channel: EventChannel) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter().filter(move |event| event.channel == channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_enumerates_each_day_once() {
        let window = ProjectionWindow::new(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(), 4);
        let days: Vec<(u32, NaiveDate)> = window.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], (3, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
        assert_eq!(window.day(4), None);
        assert_eq!(window.years_touched(), 2024..=2025);
    }

    #[test]
    fn empty_window_still_touches_its_start_year() {
        let window = ProjectionWindow::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 0);
        assert_eq!(window.days().count(), 0);
        assert_eq!(window.years_touched(), 2024..=2024);
    }
}
