//! Collector card route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use collector_circle_core::Email;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CollectorProfile;
use crate::state::AppState;

/// Collector card template.
#[derive(Template, WebTemplate)]
#[template(path = "card.html")]
pub struct CardTemplate {
    pub full_name: String,
    pub email: String,
    pub city: Option<String>,
    pub member_since: Option<String>,
    pub mediums: Vec<&'static str>,
    pub price_range: Option<&'static str>,
    pub goals: Option<String>,
}

impl CardTemplate {
    /// Flatten a profile row into display fields.
    fn from_profile(profile: CollectorProfile, email: &Email) -> Self {
        // Name and timestamp come off the row before preferences takes it.
        let full_name = profile.full_name().unwrap_or_default();
        let member_since = profile
            .created_at
            .map(|at| at.format("%B %Y").to_string());
        let preferences = profile.preferences.unwrap_or_default();

        Self {
            full_name,
            email: email.as_str().to_string(),
            city: profile.city,
            member_since,
            mediums: preferences.mediums.iter().map(|m| m.label()).collect(),
            price_range: preferences.price_range.map(|r| r.label()),
            goals: preferences.goals,
        }
    }
}

/// Display the collector's membership card.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(collector): RequireAuth,
) -> Result<Response> {
    let profile = state
        .collectors()
        .get_by_id(&collector.access_token, collector.id)
        .await?;

    // No named profile yet means registration never finished.
    let Some(profile) = profile.filter(|p| p.is_named()) else {
        return Ok(Redirect::to("/register").into_response());
    };

    Ok(CardTemplate::from_profile(profile, &collector.email).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use collector_circle_core::{CollectorId, Medium, Preferences, PriceRange};

    fn named_profile() -> CollectorProfile {
        CollectorProfile {
            id: CollectorId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: None,
            city: Some("London".into()),
            preferences: Some(Preferences {
                mediums: [Medium::Paintings, Medium::Prints].into(),
                price_range: Some(PriceRange::OneToFiveThousand),
                goals: Some("find new artists".into()),
            }),
            created_at: Some("2026-01-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap()),
        }
    }

    #[test]
    fn test_card_flattens_profile_fields() {
        let email = Email::parse("ada@example.com").unwrap();
        let card = CardTemplate::from_profile(named_profile(), &email);

        assert_eq!(card.full_name, "Ada Lovelace");
        assert_eq!(card.email, "ada@example.com");
        assert_eq!(card.city.as_deref(), Some("London"));
        assert_eq!(card.member_since.as_deref(), Some("January 2026"));
        assert_eq!(card.mediums, vec!["Paintings", "Prints"]);
        assert_eq!(card.price_range, Some("$1,000 - $5,000"));
        assert_eq!(card.goals.as_deref(), Some("find new artists"));
    }

    #[test]
    fn test_card_without_preferences_shows_empty_sections() {
        let mut profile = named_profile();
        profile.preferences = None;
        profile.created_at = None;

        let email = Email::parse("ada@example.com").unwrap();
        let card = CardTemplate::from_profile(profile, &email);

        assert_eq!(card.full_name, "Ada Lovelace");
        assert!(card.mediums.is_empty());
        assert_eq!(card.price_range, None);
        assert_eq!(card.member_since, None);
    }
}
