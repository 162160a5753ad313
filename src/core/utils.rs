use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".forecast_core";
const HOME_ENV: &str = "FORECAST_CORE_HOME";
const CONFIG_FILE: &str = "config.json";
const OUTPUT_DIR: &str = "output";

/// Returns the application-specific data directory, defaulting to `~/.forecast_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Where table, summary and calendar files land when no output directory is configured.
pub fn default_output_dir_in(base: &Path) -> PathBuf {
    base.join(OUTPUT_DIR)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_the_base() {
        let base = PathBuf::from("/tmp/forecast");
        assert_eq!(config_file_in(&base), base.join("config.json"));
        assert_eq!(default_output_dir_in(&base), base.join("output"));
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
