use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recoverable problem noticed while ingesting bills or projecting the window.
///
/// Issues never stop a projection; callers decide whether to log, display or ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionIssue {
    AmountDefaulted { bill: String, raw: String },
    IntervalDefaulted { bill: String, raw: String },
    UnknownFrequency { bill: String, raw: String },
    InvalidStartDate { bill: String, raw: String },
    InvalidEndDate { bill: String, raw: String },
    HolidayLookupFailed { year: i32, message: String },
    InvalidAdjustedDate { bill: String, date: NaiveDate },
}

impl ProjectionIssue {
    pub fn bill(&self) -> Option<&str> {
        match self {
            ProjectionIssue::AmountDefaulted { bill, .. }
            | ProjectionIssue::IntervalDefaulted { bill, .. }
            | ProjectionIssue::UnknownFrequency { bill, .. }
            | ProjectionIssue::InvalidStartDate { bill, .. }
            | ProjectionIssue::InvalidEndDate { bill, .. }
            | ProjectionIssue::InvalidAdjustedDate { bill, .. } => Some(bill),
            ProjectionIssue::HolidayLookupFailed { .. } => None,
        }
    }
}

impl fmt::Display for ProjectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionIssue::AmountDefaulted { bill, raw } => {
                write!(f, "{bill}: amount `{raw}` is not a number, using 0")
            }
            ProjectionIssue::IntervalDefaulted { bill, raw } => {
                write!(f, "{bill}: repeat interval `{raw}` is not a positive integer, using 1")
            }
            ProjectionIssue::UnknownFrequency { bill, raw } => {
                write!(f, "{bill}: frequency `{raw}` is not recognised, bill never occurs")
            }
            ProjectionIssue::InvalidStartDate { bill, raw } => {
                write!(f, "{bill}: start date `{raw}` is not a date, bill skipped")
            }
            ProjectionIssue::InvalidEndDate { bill, raw } => {
                write!(f, "{bill}: end date `{raw}` is not a date, treating as open-ended")
            }
            ProjectionIssue::HolidayLookupFailed { year, message } => {
                write!(f, "holidays for {year} unavailable: {message}")
            }
            ProjectionIssue::InvalidAdjustedDate { bill, date } => {
                write!(f, "{bill}: occurrence on {date} could not be moved to a business day")
            }
        }
    }
}
