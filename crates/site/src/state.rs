//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::services::registration::SessionEvents;
use crate::supabase::{
    ArtworksClient, CollectorsClient, GoTrueClient, StorageClient, SupabaseError,
};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration, one client per
/// hosted backend service, and the session event hub.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    gotrue: GoTrueClient,
    collectors: CollectorsClient,
    artworks: ArtworksClient,
    storage: StorageClient,
    events: SessionEvents,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend HTTP client fails to build.
    pub fn new(config: SiteConfig) -> Result<Self, SupabaseError> {
        let gotrue = GoTrueClient::new(&config.supabase)?;
        let collectors = CollectorsClient::new(&config.supabase)?;
        let artworks = ArtworksClient::new(&config.supabase)?;
        let storage = StorageClient::new(&config.supabase)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                gotrue,
                collectors,
                artworks,
                storage,
                events: SessionEvents::new(),
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the GoTrue authentication client.
    #[must_use]
    pub fn gotrue(&self) -> &GoTrueClient {
        &self.inner.gotrue
    }

    /// Get a reference to the `collectors` table client.
    #[must_use]
    pub fn collectors(&self) -> &CollectorsClient {
        &self.inner.collectors
    }

    /// Get a reference to the `artworks` table client.
    #[must_use]
    pub fn artworks(&self) -> &ArtworksClient {
        &self.inner.artworks
    }

    /// Get a reference to the artwork image storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Get a reference to the session event hub.
    #[must_use]
    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }
}
