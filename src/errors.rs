use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the projection pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Opening balance is missing: no manual override and no balance source")]
    MissingOpeningBalance,
    #[error("Opening balance is not a number: {0}")]
    InvalidOpeningBalance(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Remote request failed: {0}")]
    Remote(String),
    #[error("Holiday lookup for {year} failed: {message}")]
    HolidayFetch { year: i32, message: String },
}

impl ForecastError {
    /// Fatal configuration problems abort the run; everything else degrades.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ForecastError::MissingOpeningBalance
                | ForecastError::InvalidOpeningBalance(_)
                | ForecastError::Config(_)
        )
    }
}

pub type Result<T> = StdResult<T, ForecastError>;

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::Remote(err.to_string())
    }
}
