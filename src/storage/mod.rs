//! Collaborators around the projection: where bills and the opening balance come
//! from, and where events, the upcoming table and alerts go.

pub mod alert;
pub mod csv_backend;
pub mod http_backend;
pub mod ics_backend;
pub mod json_backend;

use std::{thread, time::Duration};

use crate::{
    errors::Result,
    ledger::BillRow,
    simulation::{BalanceSummary, LedgerEvent, UpcomingRow},
};

pub use alert::{FileAlertSink, LogAlertSink, LowBalanceAlert};
pub use csv_backend::{CsvBillSource, CsvTableSink};
pub use http_backend::HttpBalanceSource;
pub use ics_backend::IcsEventSink;

/// Ordered bill rows, read once per run.
pub trait BillSource {
    fn fetch_bills(&self) -> Result<Vec<BillRow>>;
}

/// Remote or stored opening balance.
pub trait BalanceSource {
    fn fetch_balance(&self) -> Result<f64>;
}

/// Receives projected calendar entries.
pub trait EventSink {
    /// Drops whatever a previous run left behind.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_event(&mut self, event: &LedgerEvent) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives the upcoming table in one bulk write, with its summary scalars.
pub trait TableSink {
    fn write_table(&mut self, rows: &[UpcomingRow], summary: &BalanceSummary) -> Result<()>;
}

pub trait AlertSink {
    fn send_alert(&mut self, alert: &LowBalanceAlert) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub failed: usize,
}

/// Feeds events to a sink in bounded chunks, pausing between chunks.
#[derive(Debug, Clone, Copy)]
pub struct BatchedEventWriter {
    chunk_size: usize,
    pause: Duration,
}

impl BatchedEventWriter {
    pub fn new(chunk_size: usize, pause: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            pause,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Writes every event it can. A failed event is logged and counted; the batch goes on.
    pub fn write_all(&self, sink: &mut dyn EventSink, events: &[LedgerEvent]) -> WriteReport {
        let mut report = WriteReport::default();
        if let Err(err) = sink.begin() {
            tracing::warn!(error = %err, "event sink could not be reset; keeping old entries");
        }

        for (index, chunk) in events.chunks(self.chunk_size).enumerate() {
            if index > 0 && !self.pause.is_zero() {
                thread::sleep(self.pause);
            }
            for event in chunk {
                match sink.write_event(event) {
                    Ok(()) => report.written += 1,
                    Err(err) => {
                        report.failed += 1;
                        tracing::warn!(
                            channel = event.channel.as_str(),
                            date = %event.date,
                            description = %event.description,
                            error = %err,
                            "event write failed"
                        );
                    }
                }
            }
            tracing::debug!(chunk = index, written = report.written, "event chunk flushed");
        }

        if let Err(err) = sink.finish() {
            tracing::error!(error = %err, "event sink failed to persist");
            report.failed += report.written;
            report.written = 0;
        }
        report
    }
}

impl Default for BatchedEventWriter {
    fn default() -> Self {
        Self::new(50, Duration::from_millis(200))
    }
}
