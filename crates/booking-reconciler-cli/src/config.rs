//! Layered CLI configuration: TOML file, then environment, then flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use booking_reconciler::EngineConfig;
use chrono_tz::Tz;
use serde::Deserialize;

/// Default store file when neither the config file nor a flag names one.
pub const DEFAULT_STORE: &str = "tracked-events.json";

/// Contents of the optional `--config` file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub timezone: Option<String>,
    pub store: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Settings after all layers have been applied.
#[derive(Debug)]
pub struct Settings {
    pub timezone: Tz,
    pub store: PathBuf,
}

impl Settings {
    /// `timezone` and `store` are the flag/environment values from clap; they
    /// win over the file.
    pub fn resolve(
        config_path: Option<&Path>,
        timezone: Option<&str>,
        store: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let engine = match timezone.map(str::to_string).or(file.timezone) {
            Some(timezone) => EngineConfig { timezone },
            None => EngineConfig::default(),
        };
        let timezone = engine.tz()?;

        let store = store
            .map(Path::to_path_buf)
            .or(file.store)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));

        Ok(Self { timezone, store })
    }
}
