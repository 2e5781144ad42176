use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    forecast::DEFAULT_FORECAST_URL,
    geocode::GeocoderId,
    symbols::SymbolCatalog,
};

pub const DEFAULT_USER_AGENT: &str = "metcast/0.1 (https://github.com/metcast/metcast)";

/// Configuration for a single geocoder.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeocoderConfig {
    pub api_key: Option<String>,
    /// Override for the geocoder's endpoint.
    pub base_url: Option<String>,
}

/// Where weather-symbol icons come from.
///
/// A `catalog` file wins over `template` when both are set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IconConfig {
    /// URL with a `{symbol}` placeholder.
    pub template: Option<String>,
    /// JSON file mapping `symbol_id` to `filename`.
    pub catalog: Option<PathBuf>,
    /// Prefix joined to catalog filenames.
    pub static_path: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Optional default geocoder id, "google" or "nominatim".
    pub default_geocoder: Option<String>,

    /// Example TOML:
    /// [geocoders.google]
    /// api_key = "..."
    pub geocoders: HashMap<String, GeocoderConfig>,

    pub forecast_url: Option<String>,
    pub user_agent: Option<String>,
    pub icons: IconConfig,
}

impl Config {
    /// Default geocoder as a strongly-typed id; Nominatim when none is set.
    pub fn default_geocoder_id(&self) -> Result<GeocoderId> {
        match self.default_geocoder.as_deref() {
            Some(s) => GeocoderId::try_from(s),
            None => Ok(GeocoderId::Nominatim),
        }
    }

    pub fn set_default_geocoder(&mut self, id: GeocoderId) {
        self.default_geocoder = Some(id.as_str().to_string());
    }

    pub fn geocoder_config(&self, id: GeocoderId) -> Option<&GeocoderConfig> {
        self.geocoders.get(id.as_str())
    }

    fn geocoder_config_mut(&mut self, id: GeocoderId) -> &mut GeocoderConfig {
        self.geocoders.entry(id.as_str().to_string()).or_default()
    }

    /// Returns API key for a geocoder, if present.
    pub fn geocoder_api_key(&self, id: GeocoderId) -> Option<&str> {
        self.geocoder_config(id).and_then(|cfg| cfg.api_key.as_deref())
    }

    pub fn geocoder_base_url(&self, id: GeocoderId) -> Option<&str> {
        self.geocoder_config(id).and_then(|cfg| cfg.base_url.as_deref())
    }

    /// Set/replace a geocoder API key; the geocoder becomes the default if
    /// no default was chosen yet.
    pub fn upsert_geocoder_api_key(&mut self, id: GeocoderId, api_key: String) {
        self.geocoder_config_mut(id).api_key = Some(api_key);

        if self.default_geocoder.is_none() {
            self.set_default_geocoder(id);
        }
    }

    pub fn is_geocoder_configured(&self, id: GeocoderId) -> bool {
        !id.requires_api_key() || self.geocoder_api_key(id).is_some()
    }

    pub fn forecast_url(&self) -> &str {
        self.forecast_url.as_deref().unwrap_or(DEFAULT_FORECAST_URL)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Icon lookup built from the `[icons]` section.
    pub fn symbol_catalog(&self) -> Result<SymbolCatalog> {
        if let Some(path) = &self.icons.catalog {
            let static_path = self.icons.static_path.as_deref().unwrap_or("");
            return Ok(SymbolCatalog::load(path, static_path)?);
        }

        Ok(self
            .icons
            .template
            .clone()
            .map(SymbolCatalog::Template)
            .unwrap_or_default())
    }

    /// Apply `METCAST_*` overrides. `lookup` is usually `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("METCAST_GEOCODER") {
            let id = GeocoderId::try_from(id.as_str()).context("Invalid METCAST_GEOCODER")?;
            self.set_default_geocoder(id);
        }
        if let Some(key) = lookup("METCAST_GOOGLE_API_KEY") {
            self.geocoder_config_mut(GeocoderId::Google).api_key = Some(key);
        }
        if let Some(url) = lookup("METCAST_GEOCODING_URL") {
            let id = self.default_geocoder_id()?;
            self.geocoder_config_mut(id).base_url = Some(url);
        }
        if let Some(url) = lookup("METCAST_FORECAST_URL") {
            self.forecast_url = Some(url);
        }
        if let Some(template) = lookup("METCAST_ICON_URL") {
            self.icons.template = Some(template);
        }
        if let Some(path) = lookup("METCAST_SYMBOL_CATALOG") {
            self.icons.catalog = Some(PathBuf::from(path));
        }
        if let Some(agent) = lookup("METCAST_USER_AGENT") {
            self.user_agent = Some(agent);
        }
        Ok(())
    }

    /// Load config from disk (or defaults if it doesn't exist yet), then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "metcast", "metcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
