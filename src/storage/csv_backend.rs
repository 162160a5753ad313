use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Writer};

use super::{json_backend, BillSource, TableSink};
use crate::{
    core::utils::ensure_dir,
    errors::{ForecastError, Result},
    ledger::BillRow,
    simulation::{BalanceSummary, UpcomingRow},
};

pub const UPCOMING_FILE: &str = "upcoming.csv";
pub const SUMMARY_FILE: &str = "summary.json";
const UPCOMING_HEADER: [&str; 6] = ["Name", "Amount", "Balance", "Date", "Frequency", "Category"];

/// Bills sheet exported as CSV. The first row is a header; short rows are padded.
#[derive(Debug, Clone)]
pub struct CsvBillSource {
    path: PathBuf,
}

impl CsvBillSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BillSource for CsvBillSource {
    fn fetch_bills(&self) -> Result<Vec<BillRow>> {
        if !self.path.exists() {
            return Err(ForecastError::InvalidInput(format!(
                "bill file `{}` not found",
                self.path.display()
            )));
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_path(&self.path)?;
        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            rows.push(BillRow::from_fields(record.iter()));
        }
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read bill rows");
        Ok(rows)
    }
}

/// Writes `upcoming.csv` and `summary.json` into one directory, replacing earlier runs.
#[derive(Debug, Clone)]
pub struct CsvTableSink {
    dir: PathBuf,
}

impl CsvTableSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn upcoming_path(&self) -> PathBuf {
        self.dir.join(UPCOMING_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }
}

impl TableSink for CsvTableSink {
    fn write_table(&mut self, rows: &[UpcomingRow], summary: &BalanceSummary) -> Result<()> {
        ensure_dir(&self.dir)?;

        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(UPCOMING_HEADER)?;
        for row in rows {
            writer.write_record([
                row.name.clone(),
                row.amount.to_string(),
                row.balance_after.to_string(),
                row.date.to_string(),
                row.frequency.clone(),
                row.category.clone(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ForecastError::Storage(err.to_string()))?;
        json_backend::replace_file(&self.upcoming_path(), &bytes)?;
        json_backend::save_json(&summary.rounded(), &self.summary_path())?;

        tracing::debug!(rows = rows.len(), dir = %self.dir.display(), "wrote upcoming table");
        Ok(())
    }
}
