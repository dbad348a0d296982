//! Domain models for the site.

pub mod artwork;
pub mod collector;
pub mod session;

pub use artwork::{Artwork, NewArtwork};
pub use collector::{CollectorProfile, PendingRegistration, ProfileUpdate};
pub use session::{CurrentCollector, keys as session_keys};
