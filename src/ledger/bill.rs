use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{calendar::truncate_to_day, issue::ProjectionIssue};

const INCOME_CATEGORY: &str = "paycheck";
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Raw bill record exactly as the tabular source delivers it, one text cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRow {
    pub name: String,
    pub category: String,
    pub amount: String,
    pub repeat_interval: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
}

impl BillRow {
    /// Builds a row from positional cells; missing trailing cells are empty.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cells = fields.into_iter().map(|cell| cell.as_ref().to_string());
        let mut next = || cells.next().unwrap_or_default();
        Self {
            name: next(),
            category: next(),
            amount: next(),
            repeat_interval: next(),
            frequency: next(),
            start_date: next(),
            end_date: next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Days,
    Weeks,
    Months,
    Years,
    /// Anything else; kept so the row stays visible but never occurs.
    Unknown(String),
}

impl Frequency {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "one-time" | "one time" => Frequency::OneTime,
            "days" => Frequency::Days,
            "weeks" => Frequency::Weeks,
            "months" => Frequency::Months,
            "years" => Frequency::Years,
            _ => Frequency::Unknown(normalized),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Frequency::OneTime => "one-time",
            Frequency::Days => "days",
            Frequency::Weeks => "weeks",
            Frequency::Months => "months",
            Frequency::Years => "years",
            Frequency::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Frequency::Unknown(_))
    }
}

/// Direction used when an occurrence lands on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionClass {
    /// Pulled earlier so the funds are there by the nominal date.
    Income,
    /// Pushed later.
    Expense,
}

impl TransactionClass {
    pub fn from_category(category: &str) -> Self {
        if category.trim().eq_ignore_ascii_case(INCOME_CATEGORY) {
            TransactionClass::Income
        } else {
            TransactionClass::Expense
        }
    }

    pub fn is_income(self) -> bool {
        matches!(self, TransactionClass::Income)
    }
}

/// A validated recurring or one-time obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDefinition {
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub repeat_interval: u32,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Outcome of ingesting one [`BillRow`].
#[derive(Debug, Clone, Default)]
pub struct BillParse {
    pub bill: Option<BillDefinition>,
    pub issues: Vec<ProjectionIssue>,
}

impl BillDefinition {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            amount,
            repeat_interval: 1,
            frequency,
            start_date,
            end_date: None,
        }
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.repeat_interval = interval.max(1);
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn class(&self) -> TransactionClass {
        TransactionClass::from_category(&self.category)
    }

    /// True when `date` is not past the bill's end date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| date <= end)
    }

    /// Validates a raw row, defaulting bad cells instead of rejecting the whole row.
    ///
    /// Only a missing or unreadable start date drops the bill, since nothing can anchor it.
    pub fn from_row(row: &BillRow) -> BillParse {
        let name = row.name.trim().to_string();
        if name.is_empty() {
            return BillParse::default();
        }
        let mut issues = Vec::new();

        let amount = parse_amount(&row.amount).unwrap_or_else(|| {
            issues.push(ProjectionIssue::AmountDefaulted {
                bill: name.clone(),
                raw: row.amount.clone(),
            });
            0.0
        });

        let repeat_interval = parse_interval(&row.repeat_interval).unwrap_or_else(|| {
            issues.push(ProjectionIssue::IntervalDefaulted {
                bill: name.clone(),
                raw: row.repeat_interval.clone(),
            });
            1
        });

        let frequency = Frequency::parse(&row.frequency);
        if !frequency.is_known() {
            issues.push(ProjectionIssue::UnknownFrequency {
                bill: name.clone(),
                raw: row.frequency.clone(),
            });
        }

        let Some(start_date) = parse_bill_date(&row.start_date) else {
            issues.push(ProjectionIssue::InvalidStartDate {
                bill: name,
                raw: row.start_date.clone(),
            });
            return BillParse { bill: None, issues };
        };

        let end_date = if row.end_date.trim().is_empty() {
            None
        } else {
            let parsed = parse_bill_date(&row.end_date);
            if parsed.is_none() {
                issues.push(ProjectionIssue::InvalidEndDate {
                    bill: name.clone(),
                    raw: row.end_date.clone(),
                });
            }
            parsed
        };

        BillParse {
            bill: Some(BillDefinition {
                name,
                category: row.category.trim().to_string(),
                amount,
                repeat_interval,
                frequency,
                start_date,
                end_date,
            }),
            issues,
        }
    }
}

/// Validates every row, keeping source order for both bills and issues.
pub fn ingest_rows(rows: &[BillRow]) -> (Vec<BillDefinition>, Vec<ProjectionIssue>) {
    let mut bills = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();
    for row in rows {
        let parsed = BillDefinition::from_row(row);
        issues.extend(parsed.issues);
        bills.extend(parsed.bill);
    }
    (bills, issues)
}

/// Parses free-form money text by discarding everything except digits, `.` and `-`.
///
/// The longest leading numeric prefix of what remains is used, so `"$1,234.50"` reads as
/// `1234.5` and `"12-3"` as `12`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (idx, ch) in cleaned.char_indices() {
        match ch {
            '-' if idx == 0 => end = 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            digit if digit.is_ascii_digit() => {
                seen_digit = true;
                end = idx + 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    cleaned[..end].parse().ok()
}

/// Parses the leading integer of `raw`; anything below one is rejected.
pub fn parse_interval(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits: String = trimmed
        .char_indices()
        .take_while(|(idx, ch)| ch.is_ascii_digit() || (*idx == 0 && matches!(ch, '-' | '+')))
        .map(|(_, ch)| ch)
        .collect();
    let value: i64 = digits.parse().ok()?;
    u32::try_from(value).ok().filter(|interval| *interval >= 1)
}

/// Accepts ISO dates, US-style dates and timestamps (time of day is dropped).
pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(moment) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(truncate_to_day(moment));
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|moment| truncate_to_day(moment.naive_local()))
}
