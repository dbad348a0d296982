//! Session-backed staging area.
//!
//! The production [`StagingArea`]: one well-known slot in the browser's
//! session, which survives reloads and new tabs within the same browser
//! profile but not a device change - exactly the lifetime a pending
//! registration needs.

use tower_sessions::Session;

use super::{RegistrationError, StagingArea};
use crate::models::{PendingRegistration, session_keys};

/// Staging area backed by the request's session.
pub struct SessionStaging<'a> {
    session: &'a Session,
}

impl<'a> SessionStaging<'a> {
    /// Wrap a request session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl StagingArea for SessionStaging<'_> {
    async fn put(&self, pending: &PendingRegistration) -> Result<(), RegistrationError> {
        self.session
            .insert(session_keys::PENDING_REGISTRATION, pending)
            .await
            .map_err(|e| RegistrationError::Staging(e.to_string()))
    }

    async fn get(&self) -> Result<Option<PendingRegistration>, RegistrationError> {
        self.session
            .get::<PendingRegistration>(session_keys::PENDING_REGISTRATION)
            .await
            .map_err(|e| RegistrationError::Staging(e.to_string()))
    }

    async fn clear(&self) -> Result<(), RegistrationError> {
        self.session
            .remove::<PendingRegistration>(session_keys::PENDING_REGISTRATION)
            .await
            .map(|_| ())
            .map_err(|e| RegistrationError::Staging(e.to_string()))
    }
}
