//! Artwork models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use collector_circle_core::{ArtworkId, ArtworkPrice, CollectorId};

/// An `artworks` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<ArtworkPrice>,
    #[serde(default)]
    pub city_collected: Option<String>,
    pub image_url: String,
    /// Owning collector. An artwork with no owner cannot exist; the insert
    /// sets this from the authenticated session.
    pub collector_id: CollectorId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new artwork.
///
/// Built only after the image upload succeeded, so `image_url` is always a
/// live public URL by the time the row exists.
#[derive(Debug, Clone, Serialize)]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<ArtworkPrice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_collected: Option<String>,
    pub image_url: String,
    pub collector_id: CollectorId,
}
