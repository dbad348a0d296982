//! Clients for the hosted Supabase backend.
//!
//! Each service gets its own small client in the same shape: a `reqwest`
//! client carrying the project's `apikey` header, absolute URLs built from
//! the configured project URL, and explicit status handling per call.
//!
//! - [`auth`] - GoTrue passwordless authentication (magic links)
//! - [`collectors`] - PostgREST `collectors` table
//! - [`artworks`] - PostgREST `artworks` table
//! - [`storage`] - Storage bucket for artwork images

pub mod artworks;
pub mod auth;
pub mod collectors;
pub mod storage;

pub use artworks::ArtworksClient;
pub use auth::{AuthUser, GoTrueClient, VerifiedSession};
pub use collectors::CollectorsClient;
pub use storage::StorageClient;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SupabaseConfig;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The backend throttled an email send.
    #[error("email send rate limited")]
    RateLimited,

    /// A response arrived but could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Build a `reqwest` client with the project's `apikey` default header.
///
/// Per-user authorization is added per request; GoTrue and PostgREST fall
/// back to the anonymous role when no bearer token is present.
pub(crate) fn build_client(config: &SupabaseConfig) -> Result<reqwest::Client, SupabaseError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "apikey",
        HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|e| SupabaseError::Parse(format!("Invalid anon key format: {e}")))?,
    );

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// Convert a non-success response into [`SupabaseError::Api`].
pub(crate) async fn api_error(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    SupabaseError::Api { status, message }
}
