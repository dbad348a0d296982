//! Session-related types.
//!
//! Types stored in the session for authentication state. The session is the
//! browser-scoped staging ground for everything that outlives a single
//! request but not the browser profile: the signed-in identity, the wizard's
//! half-finished answers, and the staged registration slot.

use serde::{Deserialize, Serialize};

use collector_circle_core::{CollectorId, Email};

/// Session-stored collector identity.
///
/// Established by the auth callback after GoTrue verifies a magic link.
/// The access token is the collector's JWT, forwarded on row writes so the
/// backend's row-level security sees the right user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCollector {
    /// GoTrue user ID, also the `collectors` row key.
    pub id: CollectorId,
    /// Verified email address.
    pub email: Email,
    /// Bearer token for row-level-secured backend calls.
    pub access_token: String,
}

/// Session keys for browser-scoped state.
pub mod keys {
    /// Key for the signed-in collector.
    pub const CURRENT_COLLECTOR: &str = "current_collector";

    /// The single well-known staging slot for a submitted-but-unverified
    /// registration. The name is shared with earlier clients of the same
    /// backend, which staged the identical JSON under this key.
    pub const PENDING_REGISTRATION: &str = "pendingCollectorData";

    /// Key for the wizard's step-one answers while step two is open.
    pub const REGISTRATION_PERSONAL: &str = "registration_personal";
}
