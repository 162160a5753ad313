use chrono::Datelike;

use super::{
    args::{ConfigAction, ProjectArgs},
    output,
};
use crate::{
    config::{ConfigManager, ForecastConfig, HolidayProvider},
    core::{
        services::{Collaborators, ForecastRun, ForecastService},
        Clock, FixedClock, SystemClock,
    },
    currency::{format_currency, CurrencyCode},
    errors::{ForecastError, Result},
    storage::{
        AlertSink, BalanceSource, CsvBillSource, CsvTableSink, FileAlertSink,
        HttpBalanceSource, IcsEventSink, LogAlertSink,
    },
};

const ALERTS_FILE: &str = "alerts.txt";

pub fn project(manager: &ConfigManager, args: ProjectArgs) -> Result<()> {
    let mut config = manager.load()?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let clock: Box<dyn Clock> = match args.today {
        Some(day) => Box::new(FixedClock::on(day)),
        None => Box::new(SystemClock),
    };
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| config.output_dir_in(manager.base_dir()));

    let bills = CsvBillSource::new(&args.bills);
    let remote = match config.balance_api_url.as_deref() {
        Some(url) => Some(HttpBalanceSource::new(url, &config.balance_field)?),
        None => None,
    };
    let holidays = config.holiday_source()?;
    let mut events = IcsEventSink::new(&out_dir);
    let mut table = CsvTableSink::new(&out_dir);
    let mut alerts: Box<dyn AlertSink> = if args.outbox {
        Box::new(FileAlertSink::new(out_dir.join(ALERTS_FILE)))
    } else {
        Box::new(LogAlertSink)
    };

    let run = ForecastService::new(&config, clock.as_ref()).run(Collaborators {
        bills: &bills,
        balance: remote.as_ref().map(|source| source as &dyn BalanceSource),
        holidays: holidays.as_ref(),
        events: &mut events,
        table: &mut table,
        alerts: alerts.as_mut(),
    })?;

    report(&run, &config.currency_code(), args.show);
    output::info(format!("Output written to {}", out_dir.display()));
    Ok(())
}

fn apply_overrides(config: &mut ForecastConfig, args: &ProjectArgs) {
    if let Some(days) = args.days {
        config.days_to_project = days;
    }
    if let Some(balance) = &args.balance {
        config.manual_balance = Some(balance.clone());
    }
    if let Some(url) = &args.balance_url {
        config.balance_api_url = Some(url.clone());
    }
    if let Some(provider) = args.holidays {
        config.holiday_provider = provider;
    }
    if let Some(threshold) = args.threshold {
        config.balance_threshold = threshold;
    }
}

fn report(run: &ForecastRun, currency: &CurrencyCode, show: usize) {
    let result = &run.result;
    output::section("Projection");
    output::info(format!(
        "{} days from {} (opening balance {})",
        result.window.duration_days,
        result.window.start_date,
        format_currency(result.opening_balance, currency)
    ));
    output::info(format!(
        "Lowest balance: {} on {}",
        format_currency(result.lowest_balance, currency),
        result.lowest_balance_date
    ));
    output::info(format!(
        "Highest balance: {} on {}",
        format_currency(result.highest_balance, currency),
        result.highest_balance_date
    ));
    output::info(format!(
        "Closing balance: {}",
        format_currency(result.closing_balance(), currency)
    ));

    if show > 0 && !result.upcoming.is_empty() {
        output::section("Upcoming");
        let rows: Vec<Vec<String>> = result
            .upcoming
            .iter()
            .take(show)
            .map(|row| {
                vec![
                    row.date.to_string(),
                    row.name.clone(),
                    format_currency(row.amount, currency),
                    format_currency(row.balance_after, currency),
                    row.frequency.clone(),
                ]
            })
            .collect();
        output::table(&["Date", "Name", "Amount", "Balance", "Frequency"], &rows);
        if result.upcoming.len() > show {
            output::info(format!("... {} more", result.upcoming.len() - show));
        }
    }

    for issue in &result.issues {
        output::warning(issue);
    }
    if run.events.failed > 0 {
        output::warning(format!("{} calendar entries could not be written", run.events.failed));
    }
    if !run.table_written {
        output::warning("Upcoming table could not be written");
    }
    if let Some(alert) = &run.alert {
        output::warning(format!("{}: {}", alert.subject, alert.body));
    }
    output::success(format!(
        "{} calendar entries and {} upcoming rows written",
        run.events.written,
        result.upcoming.len()
    ));
}

pub fn holidays(
    manager: &ConfigManager,
    year: i32,
    country: Option<String>,
    provider: Option<HolidayProvider>,
) -> Result<()> {
    let mut config = manager.load()?;
    if let Some(provider) = provider {
        config.holiday_provider = provider;
    }
    let country = country.unwrap_or_else(|| config.country_code.clone());
    let source = config.holiday_source()?;
    let mut dates = source.fetch_holidays(year, &country)?;
    dates.sort();
    dates.dedup();

    output::section(format!("Holidays {year} ({country}, {})", config.holiday_provider));
    if dates.is_empty() {
        output::info("No holidays");
    }
    for date in dates {
        println!("{}  {}", date, date.weekday());
    }
    Ok(())
}

pub fn config(manager: &ConfigManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = manager.load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Init { force } => {
            if manager.path().exists() && !force {
                return Err(ForecastError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    manager.path().display()
                )));
            }
            manager.save(&ForecastConfig::default())?;
            output::success(format!("Wrote {}", manager.path().display()));
        }
        ConfigAction::Path => println!("{}", manager.path().display()),
    }
    Ok(())
}
