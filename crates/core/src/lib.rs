//! Collector Circle Core - Shared types library.
//!
//! This crate provides common types used across Collector Circle components:
//! - `site` - The public web application
//! - `integration-tests` - Cross-module flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, entity IDs, prices, and the
//!   collector preference vocabulary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
