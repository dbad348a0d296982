//! PostgREST client for the `collectors` table.

use serde::de::DeserializeOwned;

use collector_circle_core::CollectorId;

use super::{SupabaseError, api_error, build_client};
use crate::config::SupabaseConfig;
use crate::models::{CollectorProfile, ProfileUpdate};
use crate::services::registration::{ProfileStore, RegistrationError};

/// Client for the `collectors` table.
#[derive(Clone)]
pub struct CollectorsClient {
    client: reqwest::Client,
    table_url: String,
}

impl CollectorsClient {
    /// Create a new collectors client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        Ok(Self {
            client: build_client(config)?,
            table_url: format!("{}/rest/v1/collectors", config.url),
        })
    }

    /// Bind the client to a collector's JWT for row-level-secured calls.
    #[must_use]
    pub const fn with_token<'a>(&'a self, access_token: &'a str) -> AuthedCollectors<'a> {
        AuthedCollectors {
            client: self,
            access_token,
        }
    }

    /// Upsert the named fields of a `collectors` row.
    ///
    /// Fields absent from `update` are never touched: the serializer skips
    /// them, and PostgREST's merge-duplicates resolution leaves unmentioned
    /// columns alone on conflict.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected or the request fails.
    pub async fn upsert(
        &self,
        access_token: &str,
        update: &ProfileUpdate,
    ) -> Result<(), SupabaseError> {
        let response = self
            .client
            .post(&self.table_url)
            .bearer_auth(access_token)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Fetch a collector's row, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded. A missing row is `Ok(None)`, not an error.
    pub async fn get_by_id(
        &self,
        access_token: &str,
        id: CollectorId,
    ) -> Result<Option<CollectorProfile>, SupabaseError> {
        let url = format!("{}?id=eq.{}&select=*", self.table_url, id);
        let rows: Vec<CollectorProfile> =
            fetch_rows(&self.client, &url, access_token).await?;
        Ok(rows.into_iter().next())
    }
}

/// A collectors client bound to one collector's JWT.
///
/// This is the concrete [`ProfileStore`] the reconciler writes through in
/// production; tests substitute an in-memory fake.
pub struct AuthedCollectors<'a> {
    client: &'a CollectorsClient,
    access_token: &'a str,
}

impl ProfileStore for AuthedCollectors<'_> {
    async fn upsert(&self, update: &ProfileUpdate) -> Result<(), RegistrationError> {
        self.client
            .upsert(self.access_token, update)
            .await
            .map_err(|e| RegistrationError::ProfileWrite(e.to_string()))
    }

    async fn get_by_id(
        &self,
        id: CollectorId,
    ) -> Result<Option<CollectorProfile>, RegistrationError> {
        self.client
            .get_by_id(self.access_token, id)
            .await
            .map_err(|e| RegistrationError::ProfileRead(e.to_string()))
    }
}

/// GET a PostgREST query and decode the row array.
pub(crate) async fn fetch_rows<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<Vec<T>, SupabaseError> {
    let response = client.get(url).bearer_auth(access_token).send().await?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    response
        .json()
        .await
        .map_err(|e| SupabaseError::Parse(e.to_string()))
}
