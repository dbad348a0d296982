//! Profile page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Artwork;
use crate::state::AppState;

/// An artwork tile on the profile page.
pub struct ArtworkView {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: Option<String>,
    pub image_url: String,
}

impl From<Artwork> for ArtworkView {
    fn from(artwork: Artwork) -> Self {
        Self {
            id: artwork.id.to_string(),
            title: artwork.title,
            artist: artwork.artist,
            price: artwork.price.map(|p| p.display()),
            image_url: artwork.image_url,
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub full_name: String,
    pub email: String,
    pub city: Option<String>,
    pub artworks: Vec<ArtworkView>,
}

/// Display the collector's profile and owned artworks.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(collector): RequireAuth,
) -> Result<Response> {
    let profile = state
        .collectors()
        .get_by_id(&collector.access_token, collector.id)
        .await?;

    let Some(profile) = profile.filter(|p| p.is_named()) else {
        return Ok(Redirect::to("/register").into_response());
    };

    let artworks = state
        .artworks()
        .list_by_collector(&collector.access_token, collector.id)
        .await?;

    Ok(ProfileTemplate {
        full_name: profile.full_name().unwrap_or_default(),
        email: collector.email.as_str().to_string(),
        city: profile.city,
        artworks: artworks.into_iter().map(ArtworkView::from).collect(),
    }
    .into_response())
}
