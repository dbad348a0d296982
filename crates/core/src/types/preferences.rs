//! Collector preference vocabulary.
//!
//! The registration wizard offers closed lists of art mediums and price
//! ranges; `goals` is free text. Serialized forms match the column values the
//! hosted `collectors` table already holds (`"paintings"`, `"$1,000 - $5,000"`,
//! ...), so rows written by earlier clients deserialize unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An art medium a collector is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Paintings,
    Sculptures,
    Photography,
    Digital,
    Prints,
    Installation,
    Mixed,
}

impl Medium {
    /// All selectable mediums, in wizard display order.
    pub const ALL: [Self; 7] = [
        Self::Paintings,
        Self::Sculptures,
        Self::Photography,
        Self::Digital,
        Self::Prints,
        Self::Installation,
        Self::Mixed,
    ];

    /// Human-readable label for forms and the profile page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paintings => "Paintings",
            Self::Sculptures => "Sculptures",
            Self::Photography => "Photography",
            Self::Digital => "Digital Art",
            Self::Prints => "Prints",
            Self::Installation => "Installation Art",
            Self::Mixed => "Mixed Media",
        }
    }

    /// The serialized identifier (also used as form checkbox value).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Paintings => "paintings",
            Self::Sculptures => "sculptures",
            Self::Photography => "photography",
            Self::Digital => "digital",
            Self::Prints => "prints",
            Self::Installation => "installation",
            Self::Mixed => "mixed",
        }
    }

    /// Parse a form checkbox value back into a medium.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.slug() == slug)
    }
}

/// A collector's preferred purchase price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "Under $1,000")]
    UnderOneThousand,
    #[serde(rename = "$1,000 - $5,000")]
    OneToFiveThousand,
    #[serde(rename = "$5,000 - $10,000")]
    FiveToTenThousand,
    #[serde(rename = "$10,000 - $50,000")]
    TenToFiftyThousand,
    #[serde(rename = "Over $50,000")]
    OverFiftyThousand,
}

impl PriceRange {
    /// All selectable ranges, in wizard display order.
    pub const ALL: [Self; 5] = [
        Self::UnderOneThousand,
        Self::OneToFiveThousand,
        Self::FiveToTenThousand,
        Self::TenToFiftyThousand,
        Self::OverFiftyThousand,
    ];

    /// The display label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderOneThousand => "Under $1,000",
            Self::OneToFiveThousand => "$1,000 - $5,000",
            Self::FiveToTenThousand => "$5,000 - $10,000",
            Self::TenToFiftyThousand => "$10,000 - $50,000",
            Self::OverFiftyThousand => "Over $50,000",
        }
    }

    /// Parse a form select value back into a range.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label)
    }
}

/// A collector's stated preferences.
///
/// Stored as one JSON value in the `collectors.preferences` column and always
/// written as a unit - there is no field-by-field merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Mediums of interest. `BTreeSet` keeps the serialized order stable.
    #[serde(default)]
    pub mediums: BTreeSet<Medium>,
    /// Preferred purchase price range, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Free-text collection goals, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_slug_roundtrip() {
        for medium in Medium::ALL {
            assert_eq!(Medium::from_slug(medium.slug()), Some(medium));
        }
        assert_eq!(Medium::from_slug("frescoes"), None);
    }

    #[test]
    fn test_medium_serializes_as_slug() {
        let json = serde_json::to_string(&Medium::Digital).unwrap();
        assert_eq!(json, "\"digital\"");
    }

    #[test]
    fn test_price_range_label_roundtrip() {
        for range in PriceRange::ALL {
            assert_eq!(PriceRange::from_label(range.label()), Some(range));
        }
        assert_eq!(PriceRange::from_label("priceless"), None);
    }

    #[test]
    fn test_price_range_serializes_as_label() {
        let json = serde_json::to_string(&PriceRange::OneToFiveThousand).unwrap();
        assert_eq!(json, "\"$1,000 - $5,000\"");
    }

    #[test]
    fn test_preferences_json_shape() {
        let prefs = Preferences {
            mediums: [Medium::Paintings, Medium::Prints].into(),
            price_range: Some(PriceRange::UnderOneThousand),
            goals: Some("find new artists".to_owned()),
        };

        let value = serde_json::to_value(&prefs).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "mediums": ["paintings", "prints"],
                "price_range": "Under $1,000",
                "goals": "find new artists",
            })
        );
    }

    #[test]
    fn test_preferences_tolerates_missing_fields() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert!(prefs.mediums.is_empty());
        assert!(prefs.price_range.is_none());
        assert!(prefs.goals.is_none());
    }
}
