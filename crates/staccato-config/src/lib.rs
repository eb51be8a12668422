// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings for the catalog search client.
///
/// The credential pair is expected from the environment or a config file;
/// there is no compiled-in default. Both base URLs can point at a mock
/// server in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_base_url: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_base_url: "https://accounts.spotify.com".to_string(),
            api_base_url: "https://api.spotify.com".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Settings for the artwork cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkConfig {
    /// Maximum number of cached images.
    pub cache_capacity: u64,
    pub request_timeout_secs: u64,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub artwork: ArtworkConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: STACCATO_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("STACCATO_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_file() {
        figment::Jail::expect_with(|_jail| {
            let config = load(None).expect("defaults should load");
            assert!(config.catalog.client_id.is_empty());
            assert_eq!(config.catalog.token_base_url, "https://accounts.spotify.com");
            assert_eq!(config.catalog.api_base_url, "https://api.spotify.com");
            assert_eq!(config.artwork.cache_capacity, 256);
            assert_eq!(config.telemetry.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_nested_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("STACCATO_CATALOG__CLIENT_ID", "id-from-env");
            jail.set_env("STACCATO_CATALOG__CLIENT_SECRET", "secret-from-env");
            jail.set_env("STACCATO_ARTWORK__CACHE_CAPACITY", "64");

            let config = load(None).expect("env overrides should load");
            assert_eq!(config.catalog.client_id, "id-from-env");
            assert_eq!(config.catalog.client_secret, "secret-from-env");
            assert_eq!(config.artwork.cache_capacity, 64);
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "staccato.toml",
                r#"
                [catalog]
                client_id = "id-from-file"
                api_base_url = "http://localhost:9900"
            "#,
            )?;

            let config = load(Some(Path::new("staccato.toml"))).expect("file config should load");
            assert_eq!(config.catalog.client_id, "id-from-file");
            assert_eq!(config.catalog.api_base_url, "http://localhost:9900");
            // Untouched sections keep their defaults.
            assert_eq!(config.telemetry.log_level, "info");
            Ok(())
        });
    }
}
