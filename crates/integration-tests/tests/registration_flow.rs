//! End-to-end tests of the deferred registration flow.
//!
//! These run the real reconciler and the real session-backed staging area
//! over an in-memory session store; only the hosted backend (magic-link
//! sender and profile table) is replaced with test doubles.

use collector_circle_core::Medium;
use collector_circle_integration_tests::{
    FakeIdentityProvider, FakeProfiles, SendBehavior, ada_identity, ada_pending, test_session,
};
use collector_circle_site::routes::auth::post_auth_destination;
use collector_circle_site::services::registration::{
    Reconciler, RegistrationError, SessionStaging, StagingArea,
};

#[tokio::test]
async fn test_registration_round_trip() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let provider = FakeIdentityProvider::accepting();
    let profiles = FakeProfiles::default();
    let who = ada_identity();

    // Visitor submits the wizard; data is staged and the link goes out.
    reconciler
        .stage(&provider, ada_pending(), &who.email, "https://site/auth/callback")
        .await
        .expect("stage succeeds");
    assert_eq!(provider.send_count(), 1);

    // Minutes later the verified identity arrives on a fresh request.
    let profile = reconciler
        .reconcile(&profiles, &who)
        .await
        .expect("reconcile succeeds");

    assert_eq!(profile.full_name().as_deref(), Some("Ada Lovelace"));
    assert_eq!(profile.city.as_deref(), Some("London"));
    let preferences = profile.preferences.clone().expect("preferences committed");
    assert!(preferences.mediums.contains(&Medium::Paintings));

    // The staged slot is consumed and the collector lands on their card.
    assert!(staging.get().await.expect("slot readable").is_none());
    assert_eq!(post_auth_destination(&profile), "/card");
}

#[tokio::test]
async fn test_duplicate_triggers_commit_once() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let provider = FakeIdentityProvider::accepting();
    let profiles = FakeProfiles::default();
    let who = ada_identity();

    reconciler
        .stage(&provider, ada_pending(), &who.email, "cb")
        .await
        .expect("stage succeeds");

    // Callback and startup check both fire.
    reconciler
        .reconcile(&profiles, &who)
        .await
        .expect("first trigger succeeds");
    reconciler
        .reconcile(&profiles, &who)
        .await
        .expect("second trigger succeeds");

    assert_eq!(profiles.upsert_count(), 1);
}

#[tokio::test]
async fn test_failed_send_keeps_answers_for_retry() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let provider = FakeIdentityProvider::accepting();
    let who = ada_identity();

    provider.set_behavior(SendBehavior::Fail);
    let err = reconciler
        .stage(&provider, ada_pending(), &who.email, "cb")
        .await
        .expect_err("send fails");
    assert!(matches!(err, RegistrationError::IdentityProvider(_)));

    // The visitor retries without retyping anything.
    assert_eq!(
        staging.get().await.expect("slot readable"),
        Some(ada_pending())
    );

    provider.set_behavior(SendBehavior::Accept);
    reconciler
        .stage(&provider, ada_pending(), &who.email, "cb")
        .await
        .expect("retry succeeds");
    assert_eq!(provider.send_count(), 2);
}

#[tokio::test]
async fn test_rate_limited_send_is_distinguished() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let provider = FakeIdentityProvider::accepting();
    provider.set_behavior(SendBehavior::RateLimit);

    let err = reconciler
        .stage(&provider, ada_pending(), &ada_identity().email, "cb")
        .await
        .expect_err("send throttled");

    assert!(matches!(err, RegistrationError::RateLimited));
    // The copy shown to the visitor tells them to wait.
    assert!(err.to_string().contains("wait"));
}

#[tokio::test]
async fn test_failed_write_retries_on_next_trigger() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let profiles = FakeProfiles::default();
    let who = ada_identity();

    staging.put(&ada_pending()).await.expect("slot writable");

    profiles.fail_next_upsert();
    let err = reconciler
        .reconcile(&profiles, &who)
        .await
        .expect_err("write fails");
    assert!(matches!(err, RegistrationError::ProfileWrite(_)));
    assert!(staging.get().await.expect("slot readable").is_some());

    let profile = reconciler
        .reconcile(&profiles, &who)
        .await
        .expect("retry succeeds");
    assert_eq!(profile.first_name.as_deref(), Some("Ada"));
    assert!(staging.get().await.expect("slot readable").is_none());
}

#[tokio::test]
async fn test_verified_without_registration_routes_to_wizard() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let profiles = FakeProfiles::default();

    // Nothing staged, no row: the caller must send them to register.
    let err = reconciler
        .reconcile(&profiles, &ada_identity())
        .await
        .expect_err("nothing to reconcile");
    assert!(matches!(err, RegistrationError::ProfileNotFound));
    assert_eq!(profiles.upsert_count(), 0);
}

#[tokio::test]
async fn test_restaging_replaces_earlier_answers() {
    let session = test_session();
    let staging = SessionStaging::new(&session);
    let reconciler = Reconciler::new(&staging);
    let provider = FakeIdentityProvider::accepting();
    let profiles = FakeProfiles::default();
    let who = ada_identity();

    reconciler
        .stage(&provider, ada_pending(), &who.email, "cb")
        .await
        .expect("first stage succeeds");

    let mut corrected = ada_pending();
    corrected.city = Some("Cambridge".to_string());
    reconciler
        .stage(&provider, corrected, &who.email, "cb")
        .await
        .expect("second stage succeeds");

    let profile = reconciler
        .reconcile(&profiles, &who)
        .await
        .expect("reconcile succeeds");

    // Only the corrected submission was committed.
    assert_eq!(profile.city.as_deref(), Some("Cambridge"));
    assert_eq!(profiles.upsert_count(), 1);
}
