//! Non-business dates and the sources they are loaded from.

use std::{
    collections::{BTreeSet, HashMap},
    ops::RangeInclusive,
    time::Duration,
};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use super::{calendar::last_day_of_month, issue::ProjectionIssue};
use crate::errors::{ForecastError, Result};

pub const DEFAULT_NAGER_BASE: &str = "https://date.nager.at/api/v3/PublicHolidays";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Supplies the public holidays of one year for a country.
pub trait HolidaySource {
    fn fetch_holidays(&self, year: i32, country_code: &str) -> Result<Vec<NaiveDate>>;
}

/// Set of holiday dates for the years a projection touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads each year once. A failed year contributes no holidays and an issue.
    pub fn load(
        source: &dyn HolidaySource,
        years: RangeInclusive<i32>,
        country_code: &str,
    ) -> (Self, Vec<ProjectionIssue>) {
        let mut calendar = Self::new();
        let mut issues = Vec::new();
        for year in years {
            match source.fetch_holidays(year, country_code) {
                Ok(dates) => {
                    tracing::debug!(year, count = dates.len(), "loaded holidays");
                    calendar.extend(dates);
                }
                Err(err) => {
                    tracing::warn!(year, error = %err, "holiday lookup failed; continuing without");
                    issues.push(ProjectionIssue::HolidayLookupFailed {
                        year,
                        message: err.to_string(),
                    });
                }
            }
        }
        (calendar, issues)
    }

    pub fn insert(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl Extend<NaiveDate> for HolidayCalendar {
    fn extend<T: IntoIterator<Item = NaiveDate>>(&mut self, iter: T) {
        self.dates.extend(iter);
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    date: NaiveDate,
    #[serde(default)]
    global: Option<bool>,
}

/// Public holidays from the Nager.Date web API. Regional holidays are ignored.
pub struct NagerHolidaySource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl NagerHolidaySource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl HolidaySource for NagerHolidaySource {
    fn fetch_holidays(&self, year: i32, country_code: &str) -> Result<Vec<NaiveDate>> {
        let url = format!("{}/{}/{}", self.base_url, year, country_code);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::HolidayFetch {
                year,
                message: format!("{url} answered {status}"),
            });
        }
        let holidays: Vec<NagerHoliday> = response.json()?;
        Ok(holidays
            .into_iter()
            .filter(|holiday| holiday.global.unwrap_or(true))
            .map(|holiday| holiday.date)
            .collect())
    }
}

/// Offline US federal holiday rules (nominal dates, no observed-day shifting).
///
/// Other country codes yield no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FederalHolidayRules;

impl FederalHolidayRules {
    pub fn us_federal(year: i32) -> Vec<NaiveDate> {
        let fixed = [(1, 1), (6, 19), (7, 4), (11, 11), (12, 25)]
            .into_iter()
            .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, month, day));
        let floating = [
            NaiveDate::from_weekday_of_month_opt(year, 1, Weekday::Mon, 3),
            NaiveDate::from_weekday_of_month_opt(year, 2, Weekday::Mon, 3),
            last_weekday_of_month(year, 5, Weekday::Mon),
            NaiveDate::from_weekday_of_month_opt(year, 9, Weekday::Mon, 1),
            NaiveDate::from_weekday_of_month_opt(year, 10, Weekday::Mon, 2),
            NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Thu, 4),
        ]
        .into_iter()
        .flatten();
        let mut dates: Vec<NaiveDate> = fixed.chain(floating).collect();
        dates.sort();
        dates
    }
}

impl HolidaySource for FederalHolidayRules {
    fn fetch_holidays(&self, year: i32, country_code: &str) -> Result<Vec<NaiveDate>> {
        if country_code.eq_ignore_ascii_case("US") {
            Ok(Self::us_federal(year))
        } else {
            Ok(Vec::new())
        }
    }
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last.checked_sub_days(chrono::Days::new(back as u64))
}

/// Treats every weekday as a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn fetch_holidays(&self, _year: i32, _country_code: &str) -> Result<Vec<NaiveDate>> {
        Ok(Vec::new())
    }
}

/// Fixed per-year holiday lists; years not present fail like an unreachable remote.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    years: HashMap<i32, Vec<NaiveDate>>,
}

impl StaticHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32, dates: Vec<NaiveDate>) -> Self {
        self.years.insert(year, dates);
        self
    }
}

impl HolidaySource for StaticHolidays {
    fn fetch_holidays(&self, year: i32, _country_code: &str) -> Result<Vec<NaiveDate>> {
        self.years
            .get(&year)
            .cloned()
            .ok_or_else(|| ForecastError::HolidayFetch {
                year,
                message: "no holiday list for this year".into(),
            })
    }
}
