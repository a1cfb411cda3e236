//! Service configuration
//!
//! TOML file with environment-variable overrides. Every field has a default
//! so the service starts with no config file at all.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP bind address
    pub bind_addr: String,
    pub transport: TransportConfig,
    pub geocoder: GeocoderConfig,
}

/// Upstream employee-data endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub base_url: String,
    /// Credentials posted with the table-data request. The upstream endpoint
    /// gates on a fixed account; these are opaque transport settings, not an
    /// auth layer.
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

/// Geocoding (Nominatim) endpoint and rate-limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Minimum spacing between external lookups. Nominatim allows one
    /// request per second; 1100ms keeps a margin.
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5780".to_string(),
            transport: TransportConfig::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backend.jotish.in/backend_dev".to_string(),
            username: "test".to_string(),
            password: "123456".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            min_interval_ms: 1100,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration: TOML file (if present) overridden by environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p)
                    .map_err(|e| Error::Config(format!("Failed to read {}: {e}", p.display())))?;
                let parsed: Config = toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", p.display())))?;
                info!(path = %p.display(), "Loaded configuration file");
                parsed
            }
            _ => Config::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Environment overrides, highest priority.
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("EMPDIR_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("EMPDIR_API_BASE_URL") {
            self.transport.base_url = v;
        }
        if let Ok(v) = std::env::var("EMPDIR_API_USERNAME") {
            self.transport.username = v;
        }
        if let Ok(v) = std::env::var("EMPDIR_API_PASSWORD") {
            self.transport.password = v;
        }
        if let Ok(v) = std::env::var("EMPDIR_GEOCODE_BASE_URL") {
            self.geocoder.base_url = v;
        }
        if let Ok(v) = std::env::var("EMPDIR_GEOCODE_MIN_INTERVAL_MS") {
            if let Ok(ms) = v.parse() {
                self.geocoder.min_interval_ms = ms;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr, "127.0.0.1:5780");
        assert_eq!(config.geocoder.min_interval_ms, 1100);
        assert_eq!(config.transport.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/empdir.toml"))).unwrap();
        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empdir.toml");
        std::fs::write(
            &path,
            "bind_addr = \"0.0.0.0:8080\"\n\n[geocoder]\nmin_interval_ms = 200\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.geocoder.min_interval_ms, 200);
        // untouched sections keep defaults
        assert_eq!(config.transport.username, "test");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empdir.toml");
        std::fs::write(&path, "bind_addr = [not toml").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
