//! PostgREST client for the `artworks` table.

use collector_circle_core::{ArtworkId, CollectorId};

use super::collectors::fetch_rows;
use super::{SupabaseError, api_error, build_client};
use crate::config::SupabaseConfig;
use crate::models::{Artwork, NewArtwork};

/// Client for the `artworks` table.
#[derive(Clone)]
pub struct ArtworksClient {
    client: reqwest::Client,
    table_url: String,
}

impl ArtworksClient {
    /// Create a new artworks client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        Ok(Self {
            client: build_client(config)?,
            table_url: format!("{}/rest/v1/artworks", config.url),
        })
    }

    /// Insert a new artwork row.
    ///
    /// The row-level policy requires `collector_id` to match the JWT's
    /// user, so an artwork can never be attributed to someone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected or the request fails.
    pub async fn insert(
        &self,
        access_token: &str,
        artwork: &NewArtwork,
    ) -> Result<(), SupabaseError> {
        let response = self
            .client
            .post(&self.table_url)
            .bearer_auth(access_token)
            .header("Prefer", "return=minimal")
            .json(artwork)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Fetch one artwork by ID, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing row is `Ok(None)`.
    pub async fn get_by_id(
        &self,
        access_token: &str,
        id: ArtworkId,
    ) -> Result<Option<Artwork>, SupabaseError> {
        let url = format!("{}?id=eq.{}&select=*", self.table_url, id);
        let rows: Vec<Artwork> = fetch_rows(&self.client, &url, access_token).await?;
        Ok(rows.into_iter().next())
    }

    /// List a collector's artworks, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_by_collector(
        &self,
        access_token: &str,
        collector_id: CollectorId,
    ) -> Result<Vec<Artwork>, SupabaseError> {
        let url = format!(
            "{}?collector_id=eq.{}&select=*&order=created_at.desc",
            self.table_url, collector_id
        );
        fetch_rows(&self.client, &url, access_token).await
    }
}
