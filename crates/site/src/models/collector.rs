//! Collector profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use collector_circle_core::{CollectorId, Email, Preferences};

/// A registration captured before the visitor has a verified identity.
///
/// Created by the wizard on submit, read and deleted exactly once by the
/// reconciler when the verified identity arrives. Never mutated in place -
/// re-staging replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub preferences: Preferences,
}

/// A durable `collectors` row, keyed by the GoTrue user ID.
///
/// The row is provisioned with the identity; every other field stays null
/// until reconciliation fills it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorProfile {
    pub id: CollectorId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CollectorProfile {
    /// `"First Last"` when both names are present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => None,
        }
    }

    /// Whether registration ever completed for this row.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.first_name.is_some() && self.last_name.is_some()
    }
}

/// The named fields a reconciliation writes into a `collectors` row.
///
/// Absent fields are skipped during serialization so the upsert never
/// touches columns the staged record did not carry. `preferences` is a
/// single JSON column replaced as a unit - no field-by-field merge.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub id: CollectorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    /// Build the row payload for a staged registration.
    #[must_use]
    pub fn from_pending(id: CollectorId, pending: PendingRegistration) -> Self {
        Self {
            id,
            first_name: Some(pending.first_name),
            last_name: Some(pending.last_name),
            city: pending.city,
            preferences: Some(pending.preferences),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use collector_circle_core::{Medium, PriceRange};

    fn sample_id() -> CollectorId {
        CollectorId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let pending = PendingRegistration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            city: None,
            preferences: Preferences::default(),
        };

        let update = ProfileUpdate::from_pending(sample_id(), pending);
        let value = serde_json::to_value(&update).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("first_name"));
        assert!(object.contains_key("preferences"));
        // Never touch columns the staged record did not carry.
        assert!(!object.contains_key("city"));
        assert!(!object.contains_key("email"));
    }

    #[test]
    fn test_update_carries_preferences_whole() {
        let pending = PendingRegistration {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            city: Some("London".into()),
            preferences: Preferences {
                mediums: [Medium::Paintings].into(),
                price_range: Some(PriceRange::OneToFiveThousand),
                goals: Some("find new artists".into()),
            },
        };

        let update = ProfileUpdate::from_pending(sample_id(), pending);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value["preferences"],
            serde_json::json!({
                "mediums": ["paintings"],
                "price_range": "$1,000 - $5,000",
                "goals": "find new artists",
            })
        );
    }

    #[test]
    fn test_profile_row_deserializes_with_nulls() {
        let profile: CollectorProfile = serde_json::from_value(serde_json::json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "first_name": null,
            "last_name": null,
            "email": "ada@example.com",
        }))
        .unwrap();

        assert!(!profile.is_named());
        assert_eq!(profile.full_name(), None);
        assert_eq!(profile.email.unwrap().as_str(), "ada@example.com");
    }

    #[test]
    fn test_full_name() {
        let profile: CollectorProfile = serde_json::from_value(serde_json::json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "first_name": "Ada",
            "last_name": "Lovelace",
        }))
        .unwrap();

        assert!(profile.is_named());
        assert_eq!(profile.full_name().unwrap(), "Ada Lovelace");
    }
}
