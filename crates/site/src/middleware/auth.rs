//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in collector in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentCollector, session_keys};

/// Extractor that requires a signed-in collector.
///
/// If the visitor is not signed in, returns a redirect to the sign-in page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(collector): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", collector.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentCollector);

/// Error returned when authentication is required but the visitor is not
/// signed in.
pub enum AuthRejection {
    /// Redirect to the sign-in page (for HTML requests).
    RedirectToSignIn,
    /// Unauthorized response (when no session layer is present).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/auth").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let collector: CurrentCollector = session
            .get(session_keys::CURRENT_COLLECTOR)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToSignIn)?;

        Ok(Self(collector))
    }
}

/// Extractor that optionally gets the current collector.
///
/// Unlike `RequireAuth`, this does not reject the request if the visitor is
/// not signed in.
pub struct OptionalAuth(pub Option<CurrentCollector>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let collector = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentCollector>(session_keys::CURRENT_COLLECTOR)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(collector))
    }
}

/// Helper to set the current collector in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_collector(
    session: &Session,
    collector: &CurrentCollector,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_COLLECTOR, collector)
        .await
}

/// Helper to clear the current collector from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_collector(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentCollector>(session_keys::CURRENT_COLLECTOR)
        .await?;
    Ok(())
}
