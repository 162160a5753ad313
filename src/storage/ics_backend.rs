use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Days, Utc};

use super::{json_backend, EventSink};
use crate::{
    errors::Result,
    simulation::{EventChannel, LedgerEvent},
};

pub const BILLS_CALENDAR_FILE: &str = "bills.ics";
pub const BALANCE_CALENDAR_FILE: &str = "balance.ics";
const PRODUCT_ID: &str = "-//forecast_core//projection//EN";

/// iCalendar files, one per channel, rewritten in full by every run.
#[derive(Debug, Clone)]
pub struct IcsEventSink {
    dir: PathBuf,
    stamp: DateTime<Utc>,
    bills: Vec<LedgerEvent>,
    balances: Vec<LedgerEvent>,
}

impl IcsEventSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stamp: Utc::now(),
            bills: Vec::new(),
            balances: Vec::new(),
        }
    }

    /// Fixes the `DTSTAMP` written on every entry.
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn path_for(&self, channel: EventChannel) -> PathBuf {
        match channel {
            EventChannel::Bill => self.dir.join(BILLS_CALENDAR_FILE),
            EventChannel::Balance => self.dir.join(BALANCE_CALENDAR_FILE),
        }
    }

    fn persist(&self, channel: EventChannel, events: &[LedgerEvent], path: &Path) -> Result<()> {
        let body = render_calendar(channel, events, self.stamp);
        json_backend::replace_file(path, body.as_bytes())
    }
}

impl EventSink for IcsEventSink {
    fn begin(&mut self) -> Result<()> {
        self.bills.clear();
        self.balances.clear();
        Ok(())
    }

    fn write_event(&mut self, event: &LedgerEvent) -> Result<()> {
        match event.channel {
            EventChannel::Bill => self.bills.push(event.clone()),
            EventChannel::Balance => self.balances.push(event.clone()),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.persist(EventChannel::Bill, &self.bills, &self.path_for(EventChannel::Bill))?;
        self.persist(
            EventChannel::Balance,
            &self.balances,
            &self.path_for(EventChannel::Balance),
        )?;
        tracing::debug!(
            bills = self.bills.len(),
            balances = self.balances.len(),
            dir = %self.dir.display(),
            "calendars written"
        );
        Ok(())
    }
}

fn render_calendar(channel: EventChannel, events: &[LedgerEvent], stamp: DateTime<Utc>) -> String {
    let name = match channel {
        EventChannel::Bill => "Bills",
        EventChannel::Balance => "Balance",
    };
    let stamp = stamp.format("%Y%m%dT%H%M%SZ");
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODUCT_ID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, &format!("X-WR-CALNAME:{name}"));
    for (index, event) in events.iter().enumerate() {
        let start = event.date;
        let end = start.checked_add_days(Days::new(1)).unwrap_or(start);
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(
            &mut out,
            &format!(
                "UID:{}-{}-{}@forecast_core",
                channel.as_str(),
                start.format("%Y%m%d"),
                index
            ),
        );
        push_line(&mut out, &format!("DTSTAMP:{stamp}"));
        push_line(&mut out, &format!("DTSTART;VALUE=DATE:{}", start.format("%Y%m%d")));
        push_line(&mut out, &format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.description)));
        push_line(&mut out, "TRANSP:TRANSPARENT");
        push_line(&mut out, "END:VEVENT");
    }
    push_line(&mut out, "END:VCALENDAR");
    out
}

fn push_line(out: &mut String, line: &str) {
    let _ = write!(out, "{line}\r\n");
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn splits_channels_into_all_day_entries() {
        let temp = tempdir().unwrap();
        let mut sink = IcsEventSink::new(temp.path());
        sink.begin().unwrap();
        sink.write_event(&LedgerEvent::bill("Rent -$1,200", date(3))).unwrap();
        sink.write_event(&LedgerEvent::balance("Balance: $800", date(3))).unwrap();
        sink.finish().unwrap();

        let bills = fs::read_to_string(sink.path_for(EventChannel::Bill)).unwrap();
        assert!(bills.contains("SUMMARY:Rent -$1\\,200\r\n"));
        assert!(bills.contains("DTSTART;VALUE=DATE:20240603\r\n"));
        assert!(bills.contains("DTEND;VALUE=DATE:20240604\r\n"));
        assert_eq!(bills.matches("BEGIN:VEVENT").count(), 1);

        let balance = fs::read_to_string(sink.path_for(EventChannel::Balance)).unwrap();
        assert!(balance.contains("SUMMARY:Balance: $800"));
    }

    #[test]
    fn a_new_run_replaces_old_entries() {
        let temp = tempdir().unwrap();
        let mut sink = IcsEventSink::new(temp.path());
        sink.write_event(&LedgerEvent::bill("Old", date(1))).unwrap();
        sink.finish().unwrap();

        sink.begin().unwrap();
        sink.write_event(&LedgerEvent::bill("New", date(2))).unwrap();
        sink.finish().unwrap();

        let bills = fs::read_to_string(sink.path_for(EventChannel::Bill)).unwrap();
        assert!(!bills.contains("SUMMARY:Old"));
        assert!(bills.contains("SUMMARY:New"));
    }
}
