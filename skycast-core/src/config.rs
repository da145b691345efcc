use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::city::{CityRecord, CityTable};

/// City shown when the user doesn't name one.
pub const DEFAULT_CITY: &str = "Istanbul";

/// Geography for a user-defined city; the name is the table key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub utc_offset_hours: i32,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// City to show when none is given, e.g. "Istanbul".
    pub default_city: Option<String>,

    /// Fixed seed for reproducible reports. Absent means fresh entropy per run.
    pub seed: Option<u64>,

    /// Example TOML:
    /// [cities.Sydney]
    /// country = "Australia"
    /// latitude = -33.8688
    /// longitude = 151.2093
    /// utc_offset_hours = 10
    #[serde(default)]
    pub cities: BTreeMap<String, CityConfig>,
}

impl Config {
    pub fn default_city(&self) -> &str {
        self.default_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn set_default_city(&mut self, name: impl Into<String>) {
        self.default_city = Some(name.into());
    }

    /// Add or replace a user city.
    pub fn upsert_city(&mut self, record: CityRecord) {
        self.cities.insert(
            record.name,
            CityConfig {
                country: record.country,
                latitude: record.latitude,
                longitude: record.longitude,
                utc_offset_hours: record.utc_offset_hours,
            },
        );
    }

    /// Builtin cities plus the ones configured here.
    pub fn city_table(&self) -> Result<CityTable> {
        let extra = self.cities.iter().map(|(name, c)| {
            CityRecord::new(
                name.clone(),
                c.country.clone(),
                c.latitude,
                c.longitude,
                c.utc_offset_hours,
            )
        });

        CityTable::with_extra(extra).context("Invalid city in configuration")
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), cities = cfg.cities.len(), "config loaded");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_city_falls_back_to_istanbul() {
        let mut cfg = Config::default();
        assert_eq!(cfg.default_city(), "Istanbul");

        cfg.set_default_city("Tokyo");
        assert_eq!(cfg.default_city(), "Tokyo");
    }

    #[test]
    fn city_table_includes_configured_cities() {
        let mut cfg = Config::default();
        cfg.upsert_city(CityRecord::new("Sydney", "Australia", -33.8688, 151.2093, 10));

        let table = cfg.city_table().expect("valid config");
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup("Sydney").country, "Australia");
        assert_eq!(table.lookup("Istanbul").country, "Turkey");
    }

    #[test]
    fn city_table_rejects_invalid_city() {
        let mut cfg = Config::default();
        cfg.upsert_city(CityRecord::new("Bad", "XX", -120.0, 0.0, 0));

        let err = cfg.city_table().unwrap_err();
        assert!(err.to_string().contains("Invalid city in configuration"));
        assert!(format!("{err:#}").contains("latitude"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_default_city("Berlin");
        cfg.seed = Some(42);
        cfg.upsert_city(CityRecord::new("Sydney", "Australia", -33.8688, 151.2093, 10));

        cfg.save_to(&path).expect("save");
        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn parses_hand_written_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
default_city = "Rome"

[cities."Cape Town"]
country = "South Africa"
latitude = -33.9249
longitude = 18.4241
"#,
        )
        .expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.default_city(), "Rome");
        assert_eq!(cfg.seed, None);

        let cape = &cfg.cities["Cape Town"];
        assert_eq!(cape.utc_offset_hours, 0);
        assert_eq!(cape.country, "South Africa");
    }

    #[test]
    fn broken_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
