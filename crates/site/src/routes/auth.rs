//! Authentication route handlers.
//!
//! Sign-in is passwordless: a magic link goes out, and the callback route is
//! where every verified identity re-enters the site. The callback and the
//! signed-in sign-in page are the two reconciliation triggers - whichever
//! runs first commits any staged registration, and the other finds the slot
//! already empty.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use collector_circle_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_collector, set_current_collector};
use crate::models::{CollectorProfile, CurrentCollector};
use crate::services::registration::{
    IdentityProvider, Reconciler, RegistrationError, SessionStaging, VerifiedIdentity,
};
use crate::state::AppState;

// =============================================================================
// Sign-in page and magic link send
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub email: String,
    pub error: Option<String>,
}

/// Check-email confirmation template for sign-in.
#[derive(Template, WebTemplate)]
#[template(path = "auth/check_email.html")]
pub struct CheckEmailTemplate {
    pub email: String,
}

/// Display the sign-in page.
///
/// A visitor who already has a session does not need a new link; this is
/// also the startup reconciliation trigger, so a staged registration left
/// over from an interrupted flow commits here.
#[instrument(skip_all)]
pub async fn sign_in_page(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(collector): OptionalAuth,
) -> Result<Response> {
    if let Some(collector) = collector {
        return match reconcile_session(&state, &session, &collector).await {
            Ok(profile) => Ok(Redirect::to(post_auth_destination(&profile)).into_response()),
            Err(RegistrationError::ProfileNotFound) => {
                Ok(Redirect::to("/register").into_response())
            }
            Err(err) => Err(AppError::Registration(err)),
        };
    }

    Ok(SignInTemplate {
        email: String::new(),
        error: None,
    }
    .into_response())
}

/// Sign-in form payload.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
}

/// Send a sign-in magic link.
#[instrument(skip_all)]
pub async fn send_link(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<SignInForm>,
) -> Result<Response> {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            return Ok(SignInTemplate {
                email: form.email,
                error: Some(e.to_string()),
            }
            .into_response());
        }
    };

    let callback = state.config().auth_callback_url();
    match IdentityProvider::send_magic_link(state.gotrue(), &email, &callback).await {
        Ok(()) => Ok(CheckEmailTemplate {
            email: email.as_str().to_string(),
        }
        .into_response()),
        Err(err @ RegistrationError::RateLimited) => Ok(SignInTemplate {
            email: email.as_str().to_string(),
            error: Some(err.to_string()),
        }
        .into_response()),
        Err(err) => Err(AppError::Registration(err)),
    }
}

// =============================================================================
// Magic link callback
// =============================================================================

/// Query parameters on the magic link landing.
///
/// GoTrue appends either a token hash or an error pair (expired link,
/// already-used link).
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub token_hash: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Auth failure template (expired or invalid link).
#[derive(Template, WebTemplate)]
#[template(path = "auth/error.html")]
pub struct AuthErrorTemplate {
    pub message: String,
}

/// Handle the magic link landing: verify, establish the session, reconcile.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    if let Some(description) = params.error_description {
        tracing::warn!(error = %description, "magic link verification rejected");
        return Ok(AuthErrorTemplate {
            message: description,
        }
        .into_response());
    }

    let Some(token_hash) = params.token_hash else {
        return Err(AppError::BadRequest(
            "missing token_hash parameter".to_string(),
        ));
    };

    let verified = state.gotrue().verify_magic_link(&token_hash).await?;
    let Some(identity) = verified.identity() else {
        return Err(AppError::Internal(
            "verified session carries no email".to_string(),
        ));
    };

    let collector = CurrentCollector {
        id: identity.id,
        email: identity.email.clone(),
        access_token: verified.access_token,
    };
    set_current_collector(&session, &collector).await?;
    set_sentry_user(&collector.id, Some(collector.email.as_str()));
    state.events().signed_in(identity.clone());
    tracing::info!(collector_id = %collector.id, "magic link verified, session established");

    match reconcile_session(&state, &session, &collector).await {
        Ok(profile) => Ok(Redirect::to(post_auth_destination(&profile)).into_response()),
        // Verified but never registered: restart the wizard.
        Err(RegistrationError::ProfileNotFound) => Ok(Redirect::to("/register").into_response()),
        Err(err) => Err(AppError::Registration(err)),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log the collector out.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(collector): OptionalAuth,
) -> Result<Response> {
    if let Some(collector) = collector {
        // Best-effort revocation; the local session is cleared regardless,
        // the JWT just stays valid until expiry if this fails.
        if let Err(e) = state.gotrue().sign_out(&collector.access_token).await {
            tracing::warn!(error = %e, "token revocation failed during logout");
        }

        clear_current_collector(&session).await?;
        state.events().signed_out();
        clear_sentry_user();
        tracing::info!(collector_id = %collector.id, "collector signed out");
    }

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Reconciliation plumbing
// =============================================================================

/// Run the registration reconciler for the current session.
///
/// Idempotent; safe to call on every verified arrival.
pub async fn reconcile_session(
    state: &AppState,
    session: &Session,
    collector: &CurrentCollector,
) -> std::result::Result<CollectorProfile, RegistrationError> {
    let staging = SessionStaging::new(session);
    let reconciler = Reconciler::new(&staging);
    let profiles = state.collectors().with_token(&collector.access_token);
    let identity = VerifiedIdentity {
        id: collector.id,
        email: collector.email.clone(),
    };
    reconciler.reconcile(&profiles, &identity).await
}

/// Where a freshly verified collector lands.
///
/// A named profile means registration completed at some point, so the
/// collector card is ready to show; an unnamed one is a bare identity row
/// and the wizard has to run.
#[must_use]
pub fn post_auth_destination(profile: &CollectorProfile) -> &'static str {
    if profile.is_named() { "/card" } else { "/register" }
}
