//! Newtype IDs for type-safe entity references.
//!
//! Supabase keys every row by UUID, so the `define_id!` macro wraps
//! [`uuid::Uuid`] rather than an integer. The wrappers prevent accidentally
//! passing an artwork ID where a collector ID is expected.

/// Macro to define a type-safe UUID-backed ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `new()`, `as_uuid()`, `parse()` from the canonical string form
/// - `From<Uuid>` / `Into<Uuid>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use collector_circle_core::define_id;
/// define_id!(CollectorId);
/// define_id!(ArtworkId);
///
/// let collector: CollectorId = "8f14e45f-ceea-467f-a8cb-9c3b1afc5c20".parse().unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ArtworkId = collector;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Create a new ID from a UUID value.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID value.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }

            /// Parse an ID from its canonical hyphenated string form.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a valid UUID.
            pub fn parse(s: &str) -> ::core::result::Result<Self, ::uuid::Error> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

// Define standard entity IDs
define_id!(CollectorId);
define_id!(ArtworkId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_parse_and_display_roundtrip() {
        let id = CollectorId::parse(SAMPLE).unwrap();
        assert_eq!(id.to_string(), SAMPLE);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CollectorId::parse("not-a-uuid").is_err());
        assert!(ArtworkId::parse("").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ArtworkId::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));

        let back: ArtworkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_uuid_conversions() {
        let uuid = uuid::Uuid::parse_str(SAMPLE).unwrap();
        let id = CollectorId::from(uuid);
        assert_eq!(uuid::Uuid::from(id), uuid);
        assert_eq!(id.as_uuid(), uuid);
    }
}
