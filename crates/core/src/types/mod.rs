//! Core types for Collector Circle.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod preferences;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use preferences::{Medium, Preferences, PriceRange};
pub use price::{ArtworkPrice, PriceError};
