//! Deferred registration reconciliation.
//!
//! Registration happens before the visitor has an account: the wizard
//! captures their answers, a magic link goes out, and the visitor leaves.
//! Minutes later they return on a fresh page load with a verified identity
//! and no memory of the form. This module owns the bridge across that gap:
//!
//! 1. [`Reconciler::stage`] parks the answers in the single staging slot and
//!    asks the identity provider to send the link.
//! 2. [`Reconciler::reconcile`] runs on every arrival with a verified
//!    session - the auth callback and the eager startup check both land
//!    here - and commits whatever is staged before returning the profile.
//!
//! Reconcile is idempotent: clearing the slot after a successful write is
//! the guard, so a duplicate trigger finds nothing staged and degrades to a
//! plain profile fetch. A failed write leaves the slot untouched and the
//! next trigger retries.
//!
//! Collaborators are traits so tests substitute in-memory fakes: the
//! staging area is injected at construction, the identity provider and
//! profile store per operation (staging is the only state the reconciler
//! owns across both).

mod error;
mod events;
mod staging;

pub use error::RegistrationError;
pub use events::{SessionEvent, SessionEvents, SessionWatch};
pub use staging::SessionStaging;

use std::future::Future;

use collector_circle_core::{CollectorId, Email};

use crate::models::{CollectorProfile, PendingRegistration, ProfileUpdate};

/// A verified identity, as established by the identity provider.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Stable unique ID, also the profile row key.
    pub id: CollectorId,
    /// The email the magic link was delivered to.
    pub email: Email,
}

/// Sends passwordless login links.
pub trait IdentityProvider {
    /// Request a magic link be emailed, landing on `redirect_to` after
    /// verification.
    fn send_magic_link(
        &self,
        email: &Email,
        redirect_to: &str,
    ) -> impl Future<Output = Result<(), RegistrationError>> + Send;
}

/// Durable per-collector profile storage.
pub trait ProfileStore {
    /// Upsert the named fields of a profile row. Fields absent from the
    /// update are never touched.
    fn upsert(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), RegistrationError>> + Send;

    /// Fetch a profile row, if one exists.
    fn get_by_id(
        &self,
        id: CollectorId,
    ) -> impl Future<Output = Result<Option<CollectorProfile>, RegistrationError>> + Send;
}

/// The single-slot staging area for a pending registration.
///
/// One slot per browser context: a second `put` before reconciliation
/// replaces the first, deliberately.
pub trait StagingArea {
    /// Stage a pending registration, overwriting any previous value.
    fn put(
        &self,
        pending: &PendingRegistration,
    ) -> impl Future<Output = Result<(), RegistrationError>> + Send;

    /// Read the staged registration, if any.
    fn get(
        &self,
    ) -> impl Future<Output = Result<Option<PendingRegistration>, RegistrationError>> + Send;

    /// Delete the staged registration.
    fn clear(&self) -> impl Future<Output = Result<(), RegistrationError>> + Send;
}

/// Bridges pre-identity registration data to a verified identity.
pub struct Reconciler<'a, S> {
    staging: &'a S,
}

impl<'a, S: StagingArea> Reconciler<'a, S> {
    /// Create a reconciler over the given staging area.
    #[must_use]
    pub const fn new(staging: &'a S) -> Self {
        Self { staging }
    }

    /// Stage a registration and trigger the magic-link email.
    ///
    /// The slot is written before the send so a failed send keeps the
    /// visitor's input; retrying `stage` overwrites the slot whole rather
    /// than merging.
    ///
    /// The caller has already validated the input: non-empty names, parsed
    /// email.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::RateLimited`] when the provider
    /// throttled the send, [`RegistrationError::IdentityProvider`] for any
    /// other send failure. The staged slot is retained on both.
    pub async fn stage<I: IdentityProvider>(
        &self,
        identity: &I,
        pending: PendingRegistration,
        email: &Email,
        redirect_to: &str,
    ) -> Result<(), RegistrationError> {
        self.staging.put(&pending).await?;
        identity.send_magic_link(email, redirect_to).await
    }

    /// Commit any staged registration against a verified identity, then
    /// return the current profile.
    ///
    /// Step order matters: read the slot, write the staged fields, clear
    /// the slot only after the write succeeded, then fetch. A write
    /// failure keeps the slot so the next trigger retries; an empty slot
    /// makes the whole call a read-only fetch.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::ProfileWrite`] when the store rejects
    /// the write (slot retained), [`RegistrationError::ProfileRead`] when
    /// the final fetch fails, and [`RegistrationError::ProfileNotFound`]
    /// when nothing was staged and no row exists - the caller must route to
    /// re-registration rather than fabricate a blank profile.
    pub async fn reconcile<P: ProfileStore>(
        &self,
        profiles: &P,
        identity: &VerifiedIdentity,
    ) -> Result<CollectorProfile, RegistrationError> {
        if let Some(pending) = self.staging.get().await? {
            let update = ProfileUpdate::from_pending(identity.id, pending);
            profiles.upsert(&update).await?;
            self.staging.clear().await?;
        }

        profiles
            .get_by_id(identity.id)
            .await?
            .ok_or(RegistrationError::ProfileNotFound)
    }
}
