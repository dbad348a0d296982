//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, trace requests)
//! 2. Session layer (tower-sessions with in-memory store)
//! 3. Auth extractors (per-handler, not a layer)

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_collector, set_current_collector};
pub use session::create_session_layer;
