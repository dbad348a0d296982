//! Registration wizard route handlers.
//!
//! Two steps: personal details, then preferences plus email. The final
//! submit stages the combined answers and sends the magic link; nothing is
//! written to the profile store until the visitor returns verified.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use collector_circle_core::{Email, Medium, Preferences, PriceRange};

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{PendingRegistration, session_keys};
use crate::services::registration::{Reconciler, RegistrationError, SessionStaging};
use crate::state::AppState;

// =============================================================================
// Step one: personal details
// =============================================================================

/// The wizard's step-one answers, parked in the session while step two is
/// open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
}

/// Step-one form payload.
#[derive(Debug, Deserialize)]
pub struct PersonalForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: String,
}

/// Step-one template.
#[derive(Template, WebTemplate)]
#[template(path = "register/personal.html")]
pub struct PersonalTemplate {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub error: Option<String>,
}

/// Display step one, prefilled if the visitor already filled it in.
#[instrument(skip_all)]
pub async fn personal_page(session: Session) -> Result<impl IntoResponse> {
    let saved: Option<PersonalDetails> = session
        .get(session_keys::REGISTRATION_PERSONAL)
        .await
        .map_err(AppError::Session)?;

    Ok(match saved {
        Some(details) => PersonalTemplate {
            first_name: details.first_name,
            last_name: details.last_name,
            city: details.city.unwrap_or_default(),
            error: None,
        },
        None => PersonalTemplate {
            first_name: String::new(),
            last_name: String::new(),
            city: String::new(),
            error: None,
        },
    })
}

/// Save step one and advance to step two.
#[instrument(skip_all)]
pub async fn save_personal(
    session: Session,
    axum::Form(form): axum::Form<PersonalForm>,
) -> Result<Response> {
    let first_name = form.first_name.trim().to_string();
    let last_name = form.last_name.trim().to_string();
    let city = normalize_optional(&form.city);

    if first_name.is_empty() || last_name.is_empty() {
        return Ok(PersonalTemplate {
            first_name,
            last_name,
            city: city.unwrap_or_default(),
            error: Some("First and last name are required.".to_string()),
        }
        .into_response());
    }

    let details = PersonalDetails {
        first_name,
        last_name,
        city,
    };
    session
        .insert(session_keys::REGISTRATION_PERSONAL, &details)
        .await
        .map_err(AppError::Session)?;

    Ok(Redirect::to("/register/preferences").into_response())
}

// =============================================================================
// Step two: preferences and email
// =============================================================================

/// A medium checkbox in the preferences form.
pub struct MediumOption {
    pub slug: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// A price range option in the preferences form.
pub struct RangeOption {
    pub label: &'static str,
    pub selected: bool,
}

/// Step-two template.
#[derive(Template, WebTemplate)]
#[template(path = "register/preferences.html")]
pub struct PreferencesTemplate {
    pub mediums: Vec<MediumOption>,
    pub ranges: Vec<RangeOption>,
    pub email: String,
    pub goals: String,
    pub error: Option<String>,
}

impl PreferencesTemplate {
    fn blank() -> Self {
        Self::from_submission(&PreferencesSubmission::default(), None)
    }

    fn from_submission(submission: &PreferencesSubmission, error: Option<String>) -> Self {
        Self {
            mediums: Medium::ALL
                .into_iter()
                .map(|m| MediumOption {
                    slug: m.slug(),
                    label: m.label(),
                    checked: submission.mediums.contains(&m),
                })
                .collect(),
            ranges: PriceRange::ALL
                .into_iter()
                .map(|r| RangeOption {
                    label: r.label(),
                    selected: submission.price_range == Some(r),
                })
                .collect(),
            email: submission.email.clone(),
            goals: submission.goals.clone().unwrap_or_default(),
            error,
        }
    }
}

/// Display step two.
///
/// Step one must be in the session; otherwise the visitor is sent back to
/// the start of the wizard.
#[instrument(skip_all)]
pub async fn preferences_page(session: Session) -> Result<Response> {
    let saved: Option<PersonalDetails> = session
        .get(session_keys::REGISTRATION_PERSONAL)
        .await
        .map_err(AppError::Session)?;

    if saved.is_none() {
        return Ok(Redirect::to("/register").into_response());
    }

    Ok(PreferencesTemplate::blank().into_response())
}

/// Check-email confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "register/check_email.html")]
pub struct CheckEmailTemplate {
    pub email: String,
}

/// Final submit: stage the registration and send the magic link.
///
/// A throttled send re-renders step two with the staged answers intact, so
/// the visitor loses nothing by waiting.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RawForm(body): RawForm,
) -> Result<Response> {
    let Some(personal) = session
        .get::<PersonalDetails>(session_keys::REGISTRATION_PERSONAL)
        .await
        .map_err(AppError::Session)?
    else {
        return Ok(Redirect::to("/register").into_response());
    };

    let submission = PreferencesSubmission::parse(&body);

    let email = match Email::parse(&submission.email) {
        Ok(email) => email,
        Err(e) => {
            return Ok(PreferencesTemplate::from_submission(
                &submission,
                Some(e.to_string()),
            )
            .into_response());
        }
    };

    let pending = PendingRegistration {
        first_name: personal.first_name,
        last_name: personal.last_name,
        city: personal.city,
        preferences: Preferences {
            mediums: submission.mediums.iter().copied().collect(),
            price_range: submission.price_range,
            goals: submission.goals.clone(),
        },
    };

    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    match reconciler
        .stage(
            state.gotrue(),
            pending,
            &email,
            &state.config().auth_callback_url(),
        )
        .await
    {
        Ok(()) => {
            // Step one has served its purpose; the staged slot carries
            // everything from here.
            session
                .remove::<PersonalDetails>(session_keys::REGISTRATION_PERSONAL)
                .await
                .map_err(AppError::Session)?;

            tracing::info!("registration staged, magic link sent");
            Ok(CheckEmailTemplate {
                email: email.as_str().to_string(),
            }
            .into_response())
        }
        Err(err @ RegistrationError::RateLimited) => Ok(PreferencesTemplate::from_submission(
            &submission,
            Some(err.to_string()),
        )
        .into_response()),
        Err(err) => Err(AppError::Registration(err)),
    }
}

// =============================================================================
// Form parsing
// =============================================================================

/// The raw step-two submission, before email validation.
#[derive(Debug, Default)]
pub struct PreferencesSubmission {
    pub email: String,
    pub mediums: Vec<Medium>,
    pub price_range: Option<PriceRange>,
    pub goals: Option<String>,
}

impl PreferencesSubmission {
    /// Parse the urlencoded form body.
    ///
    /// `mediums` is a repeated checkbox key, which `Form`'s deserializer
    /// cannot collect, so the pairs are walked directly. Unknown medium or
    /// range values are dropped rather than rejected.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let mut submission = Self::default();

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "email" => submission.email = value.trim().to_string(),
                "mediums" => {
                    if let Some(medium) = Medium::from_slug(value.as_ref()) {
                        submission.mediums.push(medium);
                    }
                }
                "price_range" => submission.price_range = PriceRange::from_label(value.as_ref()),
                "goals" => submission.goals = normalize_optional(&value),
                _ => {}
            }
        }

        submission
    }
}

/// Trim a form field, treating an empty result as absent.
fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_submission() {
        let body = b"email=ada%40example.com&mediums=paintings&mediums=prints\
            &price_range=%241%2C000+-+%245%2C000&goals=find+new+artists";
        let submission = PreferencesSubmission::parse(body);

        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.mediums, vec![Medium::Paintings, Medium::Prints]);
        assert_eq!(submission.price_range, Some(PriceRange::OneToFiveThousand));
        assert_eq!(submission.goals.as_deref(), Some("find new artists"));
    }

    #[test]
    fn test_parse_drops_unknown_values() {
        let body = b"email=a%40b.com&mediums=frescoes&price_range=priceless";
        let submission = PreferencesSubmission::parse(body);

        assert!(submission.mediums.is_empty());
        assert!(submission.price_range.is_none());
    }

    #[test]
    fn test_parse_blank_goals_is_absent() {
        let body = b"email=a%40b.com&goals=++";
        let submission = PreferencesSubmission::parse(body);
        assert!(submission.goals.is_none());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional("  London "), Some("London".to_string()));
        assert_eq!(normalize_optional("   "), None);
    }

    #[test]
    fn test_template_round_trips_submission() {
        let submission = PreferencesSubmission {
            email: "ada@example.com".into(),
            mediums: vec![Medium::Digital],
            price_range: Some(PriceRange::OverFiftyThousand),
            goals: None,
        };

        let template = PreferencesTemplate::from_submission(&submission, None);
        let digital = template
            .mediums
            .iter()
            .find(|m| m.slug == "digital")
            .unwrap();
        assert!(digital.checked);
        let selected: Vec<_> = template.ranges.iter().filter(|r| r.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Over $50,000");
    }
}
