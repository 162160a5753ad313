use std::time::{Duration, Instant};

use crate::{
    config::ForecastConfig,
    core::time::Clock,
    errors::{ForecastError, Result},
    ledger::{bill::parse_amount, ingest_rows, HolidayCalendar, HolidaySource},
    simulation::{ProjectionEngine, ProjectionResult, ProjectionWindow},
    storage::{
        AlertSink, BalanceSource, BillSource, EventSink, LowBalanceAlert, TableSink, WriteReport,
    },
};

/// Picks the opening balance: a non-blank manual override wins over the remote source.
pub fn resolve_opening_balance(
    manual: Option<&str>,
    remote: Option<&dyn BalanceSource>,
) -> Result<f64> {
    if let Some(text) = manual.filter(|text| !text.trim().is_empty()) {
        return parse_amount(text)
            .filter(|value| value.is_finite())
            .ok_or_else(|| ForecastError::InvalidOpeningBalance(text.trim().to_string()));
    }
    let Some(source) = remote else {
        return Err(ForecastError::MissingOpeningBalance);
    };
    match source.fetch_balance() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(value) => Err(ForecastError::InvalidOpeningBalance(value.to_string())),
        Err(err) => {
            tracing::error!(error = %err, "opening balance lookup failed");
            Err(ForecastError::MissingOpeningBalance)
        }
    }
}

/// Everything a run reads from or writes to.
pub struct Collaborators<'a> {
    pub bills: &'a dyn BillSource,
    pub balance: Option<&'a dyn BalanceSource>,
    pub holidays: &'a dyn HolidaySource,
    pub events: &'a mut dyn EventSink,
    pub table: &'a mut dyn TableSink,
    pub alerts: &'a mut dyn AlertSink,
}

#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub result: ProjectionResult,
    pub events: WriteReport,
    pub table_written: bool,
    pub alert: Option<LowBalanceAlert>,
    pub alert_sent: bool,
    pub elapsed: Duration,
}

/// One end-to-end projection: ingest, project, then publish.
pub struct ForecastService<'a> {
    config: &'a ForecastConfig,
    clock: &'a dyn Clock,
}

impl<'a> ForecastService<'a> {
    pub fn new(config: &'a ForecastConfig, clock: &'a dyn Clock) -> Self {
        Self { config, clock }
    }

    /// Fails only on configuration problems or an unreadable bill source; every later
    /// step degrades and is reported on the returned [`ForecastRun`].
    pub fn run(&self, io: Collaborators<'_>) -> Result<ForecastRun> {
        let started = Instant::now();
        self.config.validate()?;

        let opening_balance =
            resolve_opening_balance(self.config.manual_balance.as_deref(), io.balance)?;
        let rows = io.bills.fetch_bills()?;
        let (bills, mut issues) = ingest_rows(&rows);
        tracing::info!(
            rows = rows.len(),
            bills = bills.len(),
            opening_balance,
            "bills ingested"
        );

        let window = ProjectionWindow::new(self.clock.today(), self.config.days_to_project);
        let (holidays, holiday_issues) =
            HolidayCalendar::load(io.holidays, window.years_touched(), &self.config.country_code);
        issues.extend(holiday_issues);

        let mut result = ProjectionEngine::new(window, &holidays)
            .with_currency(self.config.currency_code())
            .project(opening_balance, &bills);
        issues.append(&mut result.issues);
        result.issues = issues;
        for issue in &result.issues {
            tracing::warn!(%issue, "projection issue");
        }

        let events = self.config.event_writer().write_all(io.events, &result.events);
        tracing::info!(written = events.written, failed = events.failed, "events published");

        let table_written = match io.table.write_table(&result.upcoming, &result.summary()) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "upcoming table write failed");
                false
            }
        };

        let alert = LowBalanceAlert::check(
            &result.summary(),
            self.config.balance_threshold,
            &self.config.currency_code(),
        );
        let alert_sent = match &alert {
            Some(alert) => match io.alerts.send_alert(alert) {
                Ok(()) => true,
                Err(err) => {
                    tracing::error!(error = %err, "low balance alert not delivered");
                    false
                }
            },
            None => false,
        };

        let elapsed = started.elapsed();
        tracing::info!(
            "projection of {} days finished in {} minutes {} seconds",
            window.duration_days,
            elapsed.as_secs() / 60,
            elapsed.as_secs() % 60
        );

        Ok(ForecastRun {
            result,
            events,
            table_written,
            alert,
            alert_sent,
            elapsed,
        })
    }
}
