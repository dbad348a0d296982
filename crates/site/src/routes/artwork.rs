//! Artwork route handlers.
//!
//! Adding an artwork is a two-call sequence against the hosted backend: the
//! image goes to storage first, and only a successful upload's public URL
//! ever reaches the `artworks` insert.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use collector_circle_core::{ArtworkId, ArtworkPrice};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::NewArtwork;
use crate::state::AppState;

/// Add-artwork form template.
#[derive(Template, WebTemplate)]
#[template(path = "artwork/new.html")]
pub struct NewArtworkTemplate {
    pub error: Option<String>,
}

/// Display the add-artwork form.
#[instrument(skip_all)]
pub async fn new_page(RequireAuth(_collector): RequireAuth) -> impl IntoResponse {
    NewArtworkTemplate { error: None }
}

/// The parsed multipart submission.
#[derive(Default)]
struct ArtworkSubmission {
    title: String,
    artist: String,
    description: Option<String>,
    price: Option<String>,
    city_collected: Option<String>,
    image: Option<UploadedImage>,
}

struct UploadedImage {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ArtworkSubmission {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !bytes.is_empty() {
                    submission.image = Some(UploadedImage {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            let trimmed = value.trim();

            match name.as_str() {
                "title" => submission.title = trimmed.to_string(),
                "artist" => submission.artist = trimmed.to_string(),
                "description" if !trimmed.is_empty() => {
                    submission.description = Some(trimmed.to_string());
                }
                "price" if !trimmed.is_empty() => submission.price = Some(trimmed.to_string()),
                "city_collected" if !trimmed.is_empty() => {
                    submission.city_collected = Some(trimmed.to_string());
                }
                _ => {}
            }
        }

        Ok(submission)
    }

    /// The first validation failure to show the collector, if any.
    fn validation_error(&self) -> Option<String> {
        if self.title.is_empty() {
            return Some("Title is required.".to_string());
        }
        if self.artist.is_empty() {
            return Some("Artist is required.".to_string());
        }
        if self.image.is_none() {
            return Some("An image is required.".to_string());
        }
        if let Some(price) = &self.price
            && ArtworkPrice::parse(price).is_err()
        {
            return Some("Price must be a non-negative number.".to_string());
        }
        None
    }
}

/// Create an artwork: upload the image, then insert the row.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(collector): RequireAuth,
    multipart: Multipart,
) -> Result<Response> {
    let submission = ArtworkSubmission::from_multipart(multipart).await?;

    if let Some(message) = submission.validation_error() {
        return Ok(NewArtworkTemplate {
            error: Some(message),
        }
        .into_response());
    }

    // Checked by validation_error above.
    let Some(image) = submission.image else {
        return Err(AppError::BadRequest("missing image".to_string()));
    };
    let price = submission
        .price
        .as_deref()
        .map(ArtworkPrice::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let image_url = state
        .storage()
        .upload_artwork_image(
            &collector.access_token,
            &image.filename,
            &image.content_type,
            image.bytes,
        )
        .await?;

    let new_artwork = NewArtwork {
        title: submission.title,
        artist: submission.artist,
        description: submission.description,
        price,
        city_collected: submission.city_collected,
        image_url,
        collector_id: collector.id,
    };
    state
        .artworks()
        .insert(&collector.access_token, &new_artwork)
        .await?;

    tracing::info!(collector_id = %collector.id, "artwork created");
    Ok(Redirect::to("/profile").into_response())
}

/// Artwork detail template.
#[derive(Template, WebTemplate)]
#[template(path = "artwork/show.html")]
pub struct ArtworkTemplate {
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub city_collected: Option<String>,
    pub image_url: String,
}

/// Display one artwork.
#[instrument(skip_all, fields(artwork_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(collector): RequireAuth,
    Path(id): Path<ArtworkId>,
) -> Result<Response> {
    let artwork = state
        .artworks()
        .get_by_id(&collector.access_token, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artwork {id}")))?;

    Ok(ArtworkTemplate {
        title: artwork.title,
        artist: artwork.artist,
        description: artwork.description,
        price: artwork.price.map(|p| p.display()),
        city_collected: artwork.city_collected,
        image_url: artwork.image_url,
    }
    .into_response())
}
