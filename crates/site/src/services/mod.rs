//! Business logic services.

pub mod registration;
