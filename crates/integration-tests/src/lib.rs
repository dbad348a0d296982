//! Integration tests for Collector Circle.
//!
//! # Test Categories
//!
//! - `registration_flow` - In-process tests of the deferred registration
//!   flow over a real session store, with the hosted backend replaced by
//!   in-memory doubles.
//! - `site_http` - HTTP tests against a running site (ignored by default).
//!
//! This library holds the shared test doubles and fixtures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tower_sessions::{MemoryStore, Session};

use collector_circle_core::{CollectorId, Email, Medium, Preferences, PriceRange};
use collector_circle_site::models::{CollectorProfile, PendingRegistration, ProfileUpdate};
use collector_circle_site::services::registration::{
    IdentityProvider, ProfileStore, RegistrationError, VerifiedIdentity,
};

/// A fresh session over an in-memory store, as the session layer would
/// hand to a request.
#[must_use]
pub fn test_session() -> Session {
    let store = Arc::new(MemoryStore::default());
    Session::new(None, store, None)
}

/// A complete wizard submission for one test collector.
#[must_use]
pub fn ada_pending() -> PendingRegistration {
    PendingRegistration {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        city: Some("London".to_string()),
        preferences: Preferences {
            mediums: [Medium::Paintings, Medium::Prints].into(),
            price_range: Some(PriceRange::OneToFiveThousand),
            goals: Some("find new artists".to_string()),
        },
    }
}

/// The verified identity the magic link establishes for the test collector.
///
/// # Panics
///
/// Panics if the fixture constants are malformed, which they are not.
#[must_use]
pub fn ada_identity() -> VerifiedIdentity {
    VerifiedIdentity {
        id: CollectorId::parse("00000000-0000-4000-8000-000000000001")
            .expect("fixture UUID is valid"),
        email: Email::parse("ada@example.com").expect("fixture email is valid"),
    }
}

/// In-memory stand-in for the hosted `collectors` table.
#[derive(Default)]
pub struct FakeProfiles {
    rows: Mutex<Vec<CollectorProfile>>,
    upserts: AtomicUsize,
    fail_next_upsert: AtomicBool,
}

impl FakeProfiles {
    /// Seed the store with an existing profile row.
    pub fn insert_row(&self, profile: CollectorProfile) {
        self.rows
            .lock()
            .expect("profiles mutex poisoned")
            .push(profile);
    }

    /// How many upserts have been committed.
    #[must_use]
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Make the next upsert fail with a write error.
    pub fn fail_next_upsert(&self) {
        self.fail_next_upsert.store(true, Ordering::SeqCst);
    }
}

impl ProfileStore for FakeProfiles {
    async fn upsert(&self, update: &ProfileUpdate) -> Result<(), RegistrationError> {
        if self.fail_next_upsert.swap(false, Ordering::SeqCst) {
            return Err(RegistrationError::ProfileWrite("backend down".to_string()));
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().expect("profiles mutex poisoned");
        if let Some(row) = rows.iter_mut().find(|r| r.id == update.id) {
            if update.first_name.is_some() {
                row.first_name.clone_from(&update.first_name);
            }
            if update.last_name.is_some() {
                row.last_name.clone_from(&update.last_name);
            }
            if update.city.is_some() {
                row.city.clone_from(&update.city);
            }
            if update.preferences.is_some() {
                row.preferences.clone_from(&update.preferences);
            }
        } else {
            rows.push(CollectorProfile {
                id: update.id,
                first_name: update.first_name.clone(),
                last_name: update.last_name.clone(),
                email: None,
                city: update.city.clone(),
                preferences: update.preferences.clone(),
                created_at: None,
            });
        }
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: CollectorId,
    ) -> Result<Option<CollectorProfile>, RegistrationError> {
        Ok(self
            .rows
            .lock()
            .expect("profiles mutex poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

/// What the fake identity provider should do with a send.
#[derive(Clone, Copy)]
pub enum SendBehavior {
    /// Accept the send.
    Accept,
    /// Report throttling.
    RateLimit,
    /// Fail for some other reason.
    Fail,
}

/// In-memory stand-in for the magic-link sender.
pub struct FakeIdentityProvider {
    behavior: Mutex<SendBehavior>,
    sends: AtomicUsize,
}

impl FakeIdentityProvider {
    /// A provider that accepts every send.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            behavior: Mutex::new(SendBehavior::Accept),
            sends: AtomicUsize::new(0),
        }
    }

    /// Change what the next sends do.
    pub fn set_behavior(&self, behavior: SendBehavior) {
        *self.behavior.lock().expect("behavior mutex poisoned") = behavior;
    }

    /// How many sends were attempted.
    #[must_use]
    pub fn send_count(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn send_magic_link(
        &self,
        _email: &Email,
        _redirect_to: &str,
    ) -> Result<(), RegistrationError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        match *self.behavior.lock().expect("behavior mutex poisoned") {
            SendBehavior::Accept => Ok(()),
            SendBehavior::RateLimit => Err(RegistrationError::RateLimited),
            SendBehavior::Fail => Err(RegistrationError::IdentityProvider(
                "smtp unreachable".to_string(),
            )),
        }
    }
}
