//! Registration error taxonomy.

use thiserror::Error;

/// Errors surfaced by the registration reconciler.
///
/// Every variant is caught at the reconciler boundary and handed to the
/// caller as a value; nothing propagates as a panic. The variants are
/// deliberately distinct where the user-facing handling differs:
/// a throttled email send gets a "wait before retrying" message, a failed
/// profile write retries on the next trigger, and a missing profile routes
/// to re-registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The identity provider throttled the email send. The visitor should
    /// wait before requesting another link.
    #[error("too many sign-in emails requested; wait a minute and try again")]
    RateLimited,

    /// The identity provider rejected the email send for any other reason.
    /// Retrying immediately is fine.
    #[error("identity provider error: {0}")]
    IdentityProvider(String),

    /// The profile store rejected the write. The staged record is retained,
    /// so the next reconciliation trigger retries it.
    #[error("profile write failed: {0}")]
    ProfileWrite(String),

    /// The profile store failed to serve a read. Anything staged was
    /// already committed before the fetch, so only the read retries.
    #[error("profile read failed: {0}")]
    ProfileRead(String),

    /// Identity verified, nothing staged, and no profile row exists:
    /// registration never completed. Callers must route to re-registration,
    /// not silently create a blank profile.
    #[error("no collector profile exists for this account")]
    ProfileNotFound,

    /// The browser-scoped staging area failed. Not retried by the staged
    /// slot mechanism since the slot itself is what is broken.
    #[error("staging area error: {0}")]
    Staging(String),
}

impl RegistrationError {
    /// Whether an immediate user-initiated retry can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::RateLimited | Self::ProfileNotFound)
    }
}
