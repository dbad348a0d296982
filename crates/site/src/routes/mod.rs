//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Health check
//!
//! # Registration wizard
//! GET  /register               - Step one: personal details
//! POST /register/personal      - Save step one, advance to step two
//! GET  /register/preferences   - Step two: preferences and email
//! POST /register               - Stage registration, send magic link
//!
//! # Auth
//! GET  /auth                   - Sign-in page (reconciles if already signed in)
//! POST /auth                   - Send a sign-in magic link
//! GET  /auth/callback          - Magic link landing; verify and reconcile
//! POST /auth/logout            - Logout action
//!
//! # Collector (requires auth)
//! GET  /card                   - Collector card
//! GET  /profile                - Profile and owned artworks
//!
//! # Artworks (requires auth)
//! GET  /artworks/new           - Add-artwork form
//! POST /artworks               - Upload image and create artwork
//! GET  /artworks/{id}          - Artwork detail
//! ```

pub mod artwork;
pub mod auth;
pub mod card;
pub mod home;
pub mod profile;
pub mod register;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the registration wizard router.
pub fn register_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(register::personal_page).post(register::submit))
        .route("/personal", post(register::save_personal))
        .route("/preferences", get(register::preferences_page))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::sign_in_page).post(auth::send_link))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the artwork routes router.
pub fn artwork_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(artwork::create))
        .route("/new", get(artwork::new_page))
        .route("/{id}", get(artwork::show))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/register", register_routes())
        .nest("/auth", auth_routes())
        .route("/card", get(card::show))
        .route("/profile", get(profile::show))
        .nest("/artworks", artwork_routes())
}
