use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{forecast::DEFAULT_DAYS, geocode::NOMINATIM_URL, nws::NWS_SERVER};

const CONFIG_FILE: &str = "config.toml";
const ADDRESS_FILE: &str = "address.txt";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// address = "1600 Pennsylvania Ave NW, Washington, DC"
/// days = 6
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Address looked up when the user doesn't ask for one.
    pub address: Option<String>,

    /// Geocoding search URL; defaults to Nominatim.
    pub geocoder_endpoint: Option<String>,

    /// Weather service root; defaults to api.weather.gov.
    pub weather_server: Option<String>,

    /// Number of periods the daily forecast shows.
    pub days: Option<usize>,
}

impl Config {
    pub fn geocoder_endpoint(&self) -> &str {
        self.geocoder_endpoint.as_deref().unwrap_or(NOMINATIM_URL)
    }

    pub fn weather_server(&self) -> &str {
        self.weather_server.as_deref().unwrap_or(NWS_SERVER)
    }

    pub fn days(&self) -> usize {
        self.days.unwrap_or(DEFAULT_DAYS)
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }

    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_dir()?)
    }

    /// Load `config.toml` from `dir`, or return an empty default if it doesn't
    /// exist yet. A legacy `address.txt` next to it fills in a missing address.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);

        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        if cfg.address.is_none() {
            let legacy = dir.join(ADDRESS_FILE);
            if legacy.exists() {
                let address = fs::read_to_string(&legacy)
                    .with_context(|| format!("Failed to read address file: {}", legacy.display()))?;
                cfg.address = Some(address);
            }
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&Self::config_dir()?)
    }

    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE);

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Platform config directory, e.g. `$XDG_CONFIG_HOME/skysniff` on Linux.
    pub fn config_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "skysniff")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().to_path_buf())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
