use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{
    source::SourceId,
    units::{DistanceUnit, Locale, PrecipitationUnit, PressureUnit, SpeedUnit, TemperatureUnit},
};

/// Per-source overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// API key, for sources that require one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL replacing the source's default instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Display units picked by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    pub temperature: TemperatureUnit,
    pub speed: SpeedUnit,
    pub pressure: PressureUnit,
    pub precipitation: PrecipitationUnit,
    pub distance: DistanceUnit,
}

/// Top-level configuration stored on disk.
///
/// Built once by the application and passed by reference to sources and the
/// refresher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional default source id, e.g. "metno" or "accu".
    #[serde(default)]
    pub default_source: Option<String>,

    /// Example TOML:
    /// [sources.accu]
    /// api_key = "..."
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,

    /// Per HTTP call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent to every provider; MET Norway rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language for provider-written texts and formatting.
    #[serde(default)]
    pub language: Locale,

    #[serde(default)]
    pub units: UnitPreferences,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("breezy/{} github.com/breezy-weather", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: None,
            sources: HashMap::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            language: Locale::default(),
            units: UnitPreferences::default(),
        }
    }
}

impl Config {
    /// Return the default source as a strongly-typed SourceId.
    pub fn default_source_id(&self) -> Result<SourceId> {
        let s = self.default_source.as_ref().ok_or_else(|| {
            anyhow!(
                "No default source configured.\n\
                 Hint: run `breezy configure <source>` (e.g. `breezy configure metno`) first."
            )
        })?;

        SourceId::try_from(s.as_str())
    }

    pub fn source_config(&self, id: SourceId) -> Option<&SourceConfig> {
        self.sources.get(id.as_str())
    }

    /// Store default source as string.
    pub fn set_default_source(&mut self, id: SourceId) {
        self.default_source = Some(id.as_str().to_string());
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "breezy-weather", "breezy")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a source API key and make it the default if none is set.
    pub fn upsert_api_key(&mut self, source_id: SourceId, api_key: String) {
        self.sources
            .entry(source_id.as_str().to_string())
            .or_default()
            .api_key = Some(api_key);

        if self.default_source.is_none() {
            self.default_source = Some(source_id.to_string());
        }
    }

    pub fn set_instance(&mut self, source_id: SourceId, instance: String) {
        self.sources
            .entry(source_id.as_str().to_string())
            .or_default()
            .instance = Some(instance);
    }

    /// Returns API key for a source, if present and non-blank.
    pub fn api_key(&self, source_id: SourceId) -> Option<&str> {
        self.source_config(source_id)
            .and_then(|cfg| cfg.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    /// Configured instance URL, without a trailing slash.
    pub fn instance(&self, source_id: SourceId) -> Option<&str> {
        self.source_config(source_id)
            .and_then(|cfg| cfg.instance.as_deref())
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    pub fn is_source_configured(&self, source_id: SourceId) -> bool {
        !source_id.requires_api_key() || self.api_key(source_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceId;

    #[test]
    fn default_source_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_source_id().unwrap_err();

        assert!(err.to_string().contains("No default source configured"));
    }

    #[test]
    fn set_api_key_and_default_for_source() {
        let mut cfg = Config::default();

        cfg.upsert_api_key(SourceId::AccuWeather, "ACCU_KEY".into());

        let default = cfg.default_source_id().expect("default source must exist");
        assert_eq!(default, SourceId::AccuWeather);

        assert_eq!(cfg.api_key(SourceId::AccuWeather), Some("ACCU_KEY"));
        assert!(cfg.is_source_configured(SourceId::AccuWeather));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_api_key(SourceId::AccuWeather, "ACCU_KEY".into());
        cfg.upsert_api_key(SourceId::Here, "HERE_KEY".into());

        let default = cfg.default_source_id().expect("default source must exist");
        assert_eq!(default, SourceId::AccuWeather);

        cfg.set_default_source(SourceId::Here);
        assert_eq!(cfg.default_source_id().unwrap(), SourceId::Here);
    }

    #[test]
    fn keyless_sources_are_always_configured() {
        let cfg = Config::default();
        assert!(cfg.is_source_configured(SourceId::MetNorway));
        assert!(!cfg.is_source_configured(SourceId::Here));
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.upsert_api_key(SourceId::Here, "   ".into());
        cfg.set_instance(SourceId::Emi, "https://mirror.example.org/".into());

        assert_eq!(cfg.api_key(SourceId::Here), None);
        assert_eq!(cfg.instance(SourceId::Emi), Some("https://mirror.example.org"));
    }

    #[test]
    fn parses_toml_with_units_and_defaults() {
        let cfg = Config::from_toml(
            r#"
            default_source = "vedur"
            language = "is"

            [units]
            speed = "bf"
            temperature = "f"

            [sources.accu]
            api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_source_id().unwrap(), SourceId::Vedur);
        assert_eq!(cfg.units.speed, SpeedUnit::Beaufort);
        assert_eq!(cfg.units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.units.pressure, PressureUnit::Hectopascal);
        assert_eq!(cfg.timeout_secs, 20);
        assert_eq!(cfg.language.language(), "is");
        assert_eq!(cfg.api_key(SourceId::AccuWeather), Some("abc"));
    }

    #[test]
    fn rejects_unknown_units() {
        let err = Config::from_toml("[units]\nspeed = \"warp\"").unwrap_err();
        assert!(format!("{err:#}").contains("warp"));
    }
}
