use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AlertSink;
use crate::{
    core::utils::ensure_dir,
    currency::{format_currency, format_short_date, CurrencyCode},
    errors::Result,
    simulation::BalanceSummary,
};

pub const ALERT_SUBJECT: &str = "Low Balance Alert: Budget Projection";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowBalanceAlert {
    pub subject: String,
    pub body: String,
    pub lowest_balance: f64,
    pub lowest_balance_date: NaiveDate,
    pub threshold: f64,
}

impl LowBalanceAlert {
    /// `Some` only when the lowest projected balance is strictly below `threshold`.
    pub fn check(summary: &BalanceSummary, threshold: f64, currency: &CurrencyCode) -> Option<Self> {
        if summary.lowest_balance >= threshold {
            return None;
        }
        let body = format!(
            "Your projected lowest balance is {} on {}. Please review your upcoming bills and expenses.",
            format_currency(summary.lowest_balance, currency),
            format_short_date(summary.lowest_balance_date),
        );
        Some(Self {
            subject: ALERT_SUBJECT.to_string(),
            body,
            lowest_balance: summary.lowest_balance,
            lowest_balance_date: summary.lowest_balance_date,
            threshold,
        })
    }
}

/// Emits alerts as warnings in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn send_alert(&mut self, alert: &LowBalanceAlert) -> Result<()> {
        tracing::warn!(subject = %alert.subject, threshold = alert.threshold, "{}", alert.body);
        Ok(())
    }
}

/// Appends alerts to a text outbox, one block per alert.
#[derive(Debug, Clone)]
pub struct FileAlertSink {
    path: PathBuf,
}

impl FileAlertSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AlertSink for FileAlertSink {
    fn send_alert(&mut self, alert: &LowBalanceAlert) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "Subject: {}\n\n{}\n", alert.subject, alert.body)?;
        Ok(())
    }
}
