//! Typed session-change notifications.
//!
//! The identity provider's "session changed" signal is modeled as an event
//! source, not a polled value: subscribers get a small closed set of typed
//! events and tear down explicitly. The auth routes publish exactly one
//! event per actual transition (sign-in, sign-out).

use tokio::sync::broadcast;

use super::VerifiedIdentity;

/// Channel capacity. Events are tiny and consumers are log-speed, so a
/// small buffer is plenty; a lagged subscriber skips to the live edge.
const CHANNEL_CAPACITY: usize = 16;

/// A session state transition.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A collector verified a magic link and now has a session.
    SignedIn(VerifiedIdentity),
    /// The session was cleared.
    SignedOut,
}

/// Hub for session-change events.
///
/// Cloneable; all clones publish into the same stream.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a new event hub.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to future session events.
    #[must_use]
    pub fn subscribe(&self) -> SessionWatch {
        SessionWatch {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish a sign-in transition.
    pub fn signed_in(&self, identity: VerifiedIdentity) {
        // Send only fails when no subscriber exists, which is fine.
        let _ = self.tx.send(SessionEvent::SignedIn(identity));
    }

    /// Publish a sign-out transition.
    pub fn signed_out(&self) {
        let _ = self.tx.send(SessionEvent::SignedOut);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to session events.
pub struct SessionWatch {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionWatch {
    /// Wait for the next event.
    ///
    /// Returns `None` once the hub is gone. A subscriber that fell behind
    /// skips to the oldest retained event rather than erroring out.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Tear down the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use collector_circle_core::{CollectorId, Email};

    fn identity() -> VerifiedIdentity {
        VerifiedIdentity {
            id: CollectorId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap(),
            email: Email::parse("ada@example.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_sees_sign_in() {
        let events = SessionEvents::new();
        let mut watch = events.subscribe();

        events.signed_in(identity());

        match watch.next().await {
            Some(SessionEvent::SignedIn(who)) => {
                assert_eq!(who.email.as_str(), "ada@example.com");
            }
            other => panic!("expected SignedIn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_one_event_per_transition() {
        let events = SessionEvents::new();
        let mut watch = events.subscribe();

        events.signed_in(identity());
        events.signed_out();

        assert!(matches!(watch.next().await, Some(SessionEvent::SignedIn(_))));
        assert!(matches!(watch.next().await, Some(SessionEvent::SignedOut)));
    }

    #[tokio::test]
    async fn test_unsubscribe_detaches_one_watcher() {
        let events = SessionEvents::new();
        let leaving = events.subscribe();
        let mut staying = events.subscribe();

        leaving.unsubscribe();
        assert_eq!(events.tx.receiver_count(), 1);

        // The remaining subscription still gets events.
        events.signed_out();
        assert!(matches!(staying.next().await, Some(SessionEvent::SignedOut)));
    }

    #[tokio::test]
    async fn test_next_ends_when_hub_dropped() {
        let events = SessionEvents::new();
        let mut watch = events.subscribe();
        drop(events);

        assert!(watch.next().await.is_none());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let events = SessionEvents::new();
        events.signed_out();

        // A later subscriber only sees events published after subscribing.
        let mut watch = events.subscribe();
        events.signed_in(identity());
        assert!(matches!(watch.next().await, Some(SessionEvent::SignedIn(_))));
    }
}
