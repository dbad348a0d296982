//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Whether a collector is signed in (switches the header actions).
    pub signed_in: bool,
}

/// Display the landing page.
#[instrument(skip_all)]
pub async fn home(OptionalAuth(collector): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        signed_in: collector.is_some(),
    }
}
