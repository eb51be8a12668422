// SPDX-License-Identifier: GPL-3.0-or-later
use std::time::Duration;

use staccato_artwork::{Artwork, ArtworkCache, ArtworkError};
use staccato_catalog::CatalogClient;
use staccato_config::AppConfig;
use tracing::info;

pub mod coordinator;
pub mod telemetry;

pub use coordinator::{ArtistSelection, SearchCoordinator, SearchSnapshot};

/// Everything an embedding UI host needs, wired from configuration.
pub struct AppState {
    pub config: AppConfig,
    pub coordinator: SearchCoordinator<CatalogClient>,
    pub artwork: ArtworkCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = CatalogClient::builder()
            .credentials(&config.catalog.client_id, &config.catalog.client_secret)
            .token_base_url(&config.catalog.token_base_url)
            .api_base_url(&config.catalog.api_base_url)
            .timeout(Duration::from_secs(config.catalog.request_timeout_secs))
            .build()?;

        let artwork_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.artwork.request_timeout_secs))
            .build()?;
        let artwork = ArtworkCache::with_client(artwork_client, config.artwork.cache_capacity);

        Ok(Self {
            coordinator: SearchCoordinator::new(catalog),
            artwork,
            config,
        })
    }

    pub fn on_start(&self) {
        info!(target: "application", "application state initialized");
    }

    /// Rendering hook for result thumbnails and the detail hero image.
    pub async fn resolve_image(&self, url: &str) -> Result<Artwork, ArtworkError> {
        self.artwork.get_or_download(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_wires_from_default_config() {
        let state = AppState::new(AppConfig::default()).expect("default config should wire");
        state.on_start();
        assert!(matches!(state.coordinator.snapshot(), SearchSnapshot::Idle));
        assert!(!state.artwork.contains("http://img/unseen.png"));
    }
}
