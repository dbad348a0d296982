//! Storage client for artwork images.
//!
//! Images land in a public bucket; the insert that follows stores the
//! derived public URL, never the raw object path.

use uuid::Uuid;

use super::{SupabaseError, api_error, build_client};
use crate::config::SupabaseConfig;

/// Client for the artwork image bucket.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl StorageClient {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: format!("{}/storage/v1", config.url),
            bucket: config.artwork_bucket.clone(),
        })
    }

    /// Upload an image and return its public URL.
    ///
    /// The object name is a fresh UUID plus the original file extension, so
    /// uploads never collide and never leak the uploader's filename.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the request fails.
    pub async fn upload_artwork_image(
        &self,
        access_token: &str,
        original_filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, SupabaseError> {
        let path = object_path(original_filename);
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(self.public_url(&path))
    }

    /// The public URL for an object in the artwork bucket.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }
}

/// Build a collision-free object name, keeping the file extension.
fn object_path(original_filename: &str) -> String {
    let id = Uuid::new_v4();
    match original_filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{id}.{}", ext.to_lowercase()),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_keeps_extension() {
        let path = object_path("My Painting.JPG");
        assert!(path.ends_with(".jpg"));
        assert!(!path.contains("My Painting"));
    }

    #[test]
    fn test_object_path_without_extension() {
        let path = object_path("scan");
        assert!(!path.contains('.'));
    }

    #[test]
    fn test_object_paths_do_not_collide() {
        assert_ne!(object_path("a.png"), object_path("a.png"));
    }
}
