//! Bill definitions, calendar rules and recurrence evaluation.

pub mod bill;
pub mod business_day;
pub mod calendar;
pub mod holidays;
pub mod issue;
pub mod recurring;

pub use bill::{ingest_rows, BillDefinition, BillParse, BillRow, Frequency, TransactionClass};
pub use business_day::{adjust, is_business_day};
pub use holidays::{
    FederalHolidayRules, HolidayCalendar, HolidaySource, NagerHolidaySource, NoHolidays,
    StaticHolidays,
};
pub use issue::ProjectionIssue;
pub use recurring::RecurrenceEvaluator;
