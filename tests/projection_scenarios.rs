use forecast_core::{
    ledger::{
        ingest_rows, BillDefinition, BillRow, FederalHolidayRules, Frequency, HolidayCalendar,
        ProjectionIssue, StaticHolidays,
    },
    simulation::{EventChannel, ProjectionEngine, ProjectionWindow},
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn us_holidays(window: &ProjectionWindow) -> HolidayCalendar {
    let (calendar, issues) = HolidayCalendar::load(&FederalHolidayRules, window.years_touched(), "US");
    assert!(issues.is_empty());
    calendar
}

#[test]
fn weekly_paycheck_over_two_weeks() {
    let window = ProjectionWindow::new(date(2024, 6, 3), 14);
    let holidays = us_holidays(&window);
    // 2024-06-07 is a Friday.
    let bills = vec![BillDefinition::new(
        "Paycheck",
        "paycheck",
        500.0,
        Frequency::Weeks,
        date(2024, 6, 7),
    )];

    let result = ProjectionEngine::new(window, &holidays).project(1000.0, &bills);

    let dates: Vec<NaiveDate> = result.upcoming.iter().map(|row| row.date).collect();
    assert_eq!(dates, vec![date(2024, 6, 7), date(2024, 6, 14)]);
    assert_eq!(result.daily_balances[3].balance, 1000.0);
    assert_eq!(result.daily_balances[4].balance, 1500.0);
    assert_eq!(result.daily_balances[11].balance, 2000.0);
    assert_eq!(result.closing_balance(), 2000.0);
    assert_eq!(result.highest_balance_date, date(2024, 6, 14));
}

#[test]
fn paycheck_due_on_day_zero_is_listed_but_not_counted() {
    let window = ProjectionWindow::new(date(2024, 6, 7), 14);
    let holidays = us_holidays(&window);
    let bills = vec![BillDefinition::new(
        "Paycheck",
        "Paycheck",
        500.0,
        Frequency::Weeks,
        date(2024, 6, 7),
    )];

    let result = ProjectionEngine::new(window, &holidays).project(1000.0, &bills);

    assert_eq!(result.upcoming.len(), 2);
    assert_eq!(result.daily_balances[0].balance, 1000.0);
    assert_eq!(result.closing_balance(), 1500.0);
    let first = result.events.first().unwrap();
    assert_eq!(first.channel, EventChannel::Bill);
    assert_eq!(first.description, "Paycheck +$500");
}

#[test]
fn month_end_bill_over_ninety_days() {
    let window = ProjectionWindow::new(date(2024, 2, 1), 90);
    let holidays = us_holidays(&window);
    let bills = vec![BillDefinition::new(
        "Rent",
        "Housing",
        -1000.0,
        Frequency::Months,
        date(2024, 1, 31),
    )];

    let result = ProjectionEngine::new(window, &holidays).project(5000.0, &bills);

    // March 31 is a Sunday, so that payment goes out Monday April 1.
    let dates: Vec<NaiveDate> = result.upcoming.iter().map(|row| row.date).collect();
    assert_eq!(dates, vec![date(2024, 2, 29), date(2024, 4, 1), date(2024, 4, 30)]);
    let balances: Vec<f64> = result.upcoming.iter().map(|row| row.balance_after).collect();
    assert_eq!(balances, vec![5000.0, 4000.0, 3000.0]);
    assert_eq!(result.lowest_balance, 2000.0);
    assert_eq!(result.lowest_balance_date, date(2024, 4, 30));
}

#[test]
fn paycheck_on_a_holiday_arrives_the_day_before() {
    let window = ProjectionWindow::new(date(2024, 7, 1), 10);
    let holidays = us_holidays(&window);
    let bills = vec![BillDefinition::new(
        "Paycheck",
        "paycheck",
        2000.0,
        Frequency::Months,
        date(2024, 1, 4),
    )];

    let result = ProjectionEngine::new(window, &holidays).project(0.0, &bills);

    assert_eq!(result.upcoming.len(), 1);
    assert_eq!(result.upcoming[0].date, date(2024, 7, 3));
}

#[test]
fn malformed_rows_never_stop_the_projection() {
    let rows = vec![
        BillRow::from_fields(["Bad Amount", "misc", "abc", "1", "days", "2024-06-03", ""]),
        BillRow::from_fields(["No Interval", "misc", "-10", "", "weeks", "2024-06-03", ""]),
        BillRow::from_fields(["Odd", "misc", "-5", "1", "fortnightly", "2024-06-03", ""]),
        BillRow::from_fields(["Rent", "Housing", "-$100", "1", "one-time", "6/5/2024", ""]),
    ];
    let (bills, issues) = ingest_rows(&rows);
    assert_eq!(bills.len(), 4);
    assert!(matches!(issues[0], ProjectionIssue::AmountDefaulted { .. }));
    assert!(matches!(issues[1], ProjectionIssue::IntervalDefaulted { .. }));
    assert!(matches!(issues[2], ProjectionIssue::UnknownFrequency { .. }));

    let window = ProjectionWindow::new(date(2024, 6, 3), 14);
    let holidays = HolidayCalendar::new();
    let result = ProjectionEngine::new(window, &holidays).project(1000.0, &bills);

    let count = |name: &str| result.upcoming.iter().filter(|row| row.name == name).count();
    assert_eq!(count("Bad Amount"), 14);
    assert_eq!(count("No Interval"), 2);
    assert_eq!(count("Odd"), 0);
    assert_eq!(count("Rent"), 1);
    assert_eq!(result.closing_balance(), 1000.0 - 10.0 - 100.0);
}

#[test]
fn extremes_bound_every_daily_balance() {
    let window = ProjectionWindow::new(date(2024, 11, 15), 365);
    let holidays = us_holidays(&window);
    let bills = vec![
        BillDefinition::new("Pay", "Paycheck", 1850.0, Frequency::Weeks, date(2024, 11, 1)).every(2),
        BillDefinition::new("Rent", "Housing", -1600.0, Frequency::Months, date(2024, 1, 1)),
        BillDefinition::new("Card", "Debt", -420.0, Frequency::Months, date(2024, 3, 31)),
        BillDefinition::new("Groceries", "Food", -95.0, Frequency::Days, date(2024, 11, 16)).every(4),
        BillDefinition::new("Insurance", "Auto", -780.0, Frequency::Years, date(2023, 12, 25)),
        BillDefinition::new("Bonus", "Paycheck", 3000.0, Frequency::OneTime, date(2025, 3, 15)),
    ];

    let result = ProjectionEngine::new(window, &holidays).project(2500.0, &bills);

    assert_eq!(result.daily_balances.len(), 365);
    for day in &result.daily_balances {
        assert!(result.lowest_balance <= day.balance, "{} below lowest", day.date);
        assert!(day.balance <= result.highest_balance, "{} above highest", day.date);
    }
    assert_eq!(result.events_on(EventChannel::Balance).count(), 365);
    assert_eq!(
        result.events_on(EventChannel::Bill).count(),
        result.upcoming.len()
    );
}

#[test]
fn missing_holiday_year_is_reported_and_skipped() {
    let window = ProjectionWindow::new(date(2024, 12, 20), 30);
    let source = StaticHolidays::new().with_year(2024, vec![date(2024, 12, 25)]);
    let (holidays, issues) = HolidayCalendar::load(&source, window.years_touched(), "US");

    assert!(holidays.is_holiday(date(2024, 12, 25)));
    assert_eq!(issues.len(), 1);
    assert!(matches!(issues[0], ProjectionIssue::HolidayLookupFailed { year: 2025, .. }));

    // Christmas 2024 is a Wednesday; the bill moves to Thursday.
    let bills = vec![BillDefinition::new(
        "Gift card",
        "misc",
        -50.0,
        Frequency::OneTime,
        date(2024, 12, 25),
    )];
    let result = ProjectionEngine::new(window, &holidays).project(100.0, &bills);
    assert_eq!(result.upcoming[0].date, date(2024, 12, 26));
}
