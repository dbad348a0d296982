//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::registration::RegistrationError;
use crate::supabase::SupabaseError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration or reconciliation failed.
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Hosted backend call failed.
    #[error("Backend error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Visitor is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is worth a Sentry event.
    const fn is_server_fault(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Registration(err) => err.is_retryable(),
            Self::Supabase(err) => !matches!(err, SupabaseError::RateLimited),
            Self::NotFound(_) | Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Registration(err) => match err {
                RegistrationError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                RegistrationError::ProfileNotFound => StatusCode::NOT_FOUND,
                RegistrationError::IdentityProvider(_)
                | RegistrationError::ProfileWrite(_)
                | RegistrationError::ProfileRead(_) => StatusCode::BAD_GATEWAY,
                RegistrationError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Supabase(err) => match err {
                SupabaseError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            // The rate-limit copy must tell the visitor to wait.
            Self::Registration(RegistrationError::RateLimited)
            | Self::Supabase(SupabaseError::RateLimited) => {
                "Too many sign-in emails requested. Please wait a minute and try again."
                    .to_string()
            }
            Self::Registration(RegistrationError::ProfileNotFound) => {
                "No profile exists for this account yet. Please register first.".to_string()
            }
            Self::Registration(_) | Self::Supabase(_) => "External service error".to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a collector ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("artwork-123".to_string());
        assert_eq!(err.to_string(), "Not found: artwork-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        assert_eq!(
            get_status(AppError::Registration(RegistrationError::RateLimited)),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Supabase(SupabaseError::RateLimited)),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_backend_faults_map_to_bad_gateway() {
        assert_eq!(
            get_status(AppError::Registration(RegistrationError::ProfileWrite(
                "boom".into()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Registration(RegistrationError::ProfileRead(
                "boom".into()
            ))),
            StatusCode::BAD_GATEWAY
        );
    }
}
