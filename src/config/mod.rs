use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    core::utils::{app_data_dir, config_file_in, default_output_dir_in, ensure_dir},
    currency::CurrencyCode,
    errors::{ForecastError, Result},
    ledger::{
        holidays::DEFAULT_NAGER_BASE, FederalHolidayRules, HolidaySource, NagerHolidaySource,
        NoHolidays,
    },
    storage::{json_backend, BatchedEventWriter},
};

/// Where holiday dates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayProvider {
    /// Nager.Date public holiday API.
    Nager,
    /// US federal holidays computed locally.
    #[default]
    Builtin,
    None,
}

impl FromStr for HolidayProvider {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nager" => Ok(HolidayProvider::Nager),
            "builtin" => Ok(HolidayProvider::Builtin),
            "none" => Ok(HolidayProvider::None),
            other => Err(ForecastError::Config(format!(
                "unknown holiday provider `{other}` (expected nager, builtin or none)"
            ))),
        }
    }
}

impl fmt::Display for HolidayProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HolidayProvider::Nager => "nager",
            HolidayProvider::Builtin => "builtin",
            HolidayProvider::None => "none",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub days_to_project: u32,
    pub balance_threshold: f64,
    pub country_code: String,
    pub currency: String,
    pub holiday_provider: HolidayProvider,
    pub holiday_api_base: String,
    /// Text override for the opening balance; wins over `balance_api_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_api_url: Option<String>,
    pub balance_field: String,
    pub event_chunk_size: usize,
    pub event_chunk_pause_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days_to_project: 100,
            balance_threshold: 2000.0,
            country_code: "US".into(),
            currency: "USD".into(),
            holiday_provider: HolidayProvider::default(),
            holiday_api_base: DEFAULT_NAGER_BASE.into(),
            manual_balance: None,
            balance_api_url: None,
            balance_field: "balance".into(),
            event_chunk_size: 50,
            event_chunk_pause_ms: 200,
            output_dir: None,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.balance_threshold.is_finite() {
            return Err(ForecastError::Config(
                "balance_threshold must be a finite number".into(),
            ));
        }
        if self.country_code.trim().is_empty() {
            return Err(ForecastError::Config("country_code must not be empty".into()));
        }
        if self.event_chunk_size == 0 {
            return Err(ForecastError::Config(
                "event_chunk_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }

    pub fn event_writer(&self) -> BatchedEventWriter {
        BatchedEventWriter::new(
            self.event_chunk_size,
            Duration::from_millis(self.event_chunk_pause_ms),
        )
    }

    pub fn holiday_source(&self) -> Result<Box<dyn HolidaySource>> {
        let source: Box<dyn HolidaySource> = match self.holiday_provider {
            HolidayProvider::Nager => Box::new(NagerHolidaySource::new(&self.holiday_api_base)?),
            HolidayProvider::Builtin => Box::new(FederalHolidayRules),
            HolidayProvider::None => Box::new(NoHolidays),
        };
        Ok(source)
    }

    /// Configured output directory, or `<base>/output`.
    pub fn output_dir_in(&self, base: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir_in(base))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// Reads `config.json`, falling back to defaults when it does not exist yet.
    pub fn load(&self) -> Result<ForecastConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: ForecastConfig = serde_json::from_str(&data)
                .map_err(|err| ForecastError::Config(format!("{}: {err}", self.path.display())))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(ForecastConfig::default())
        }
    }

    pub fn save(&self, config: &ForecastConfig) -> Result<()> {
        config.validate()?;
        json_backend::save_json(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(config.days_to_project, 100);
        assert_eq!(config.balance_threshold, 2000.0);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = ForecastConfig {
            days_to_project: 30,
            manual_balance: Some("$1,500".into()),
            holiday_provider: HolidayProvider::None,
            ..ForecastConfig::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"days_to_project": 14, "holiday_provider": "nager"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.days_to_project, 14);
        assert_eq!(config.holiday_provider, HolidayProvider::Nager);
        assert_eq!(config.event_chunk_size, 50);
    }

    #[test]
    fn malformed_files_are_config_errors() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(ForecastError::Config(_))));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = ForecastConfig {
            event_chunk_size: 0,
            ..ForecastConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn providers_parse_case_insensitively() {
        assert_eq!("NAGER".parse::<HolidayProvider>().unwrap(), HolidayProvider::Nager);
        assert!("calendarific".parse::<HolidayProvider>().is_err());
        assert_eq!(HolidayProvider::Builtin.to_string(), "builtin");
    }
}
