// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session/profile orchestrator.
//!
//! Keeps the client's view of identity and profile state synchronized
//! with the hosted provider and drives the redirect decision:
//! session fetch, profile fetch keyed by user id, create-if-absent on
//! first sign-in, and auth-event fanout to subscribers.
//!
//! Any remote failure during bootstrap degrades to the unauthenticated
//! snapshot. Failures are logged, never retried.

use crate::db::RestStore;
use crate::error::AppError;
use crate::models::{AuthEvent, UserProfile};
use crate::redirect::decide_redirect;
use crate::services::identity::{AuthUserInfo, IdentityClient};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Buffered auth events per subscriber before lagging ones are dropped.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Result of a session bootstrap: who is signed in, their profile, and
/// where the client should navigate from its current path.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub user: Option<AuthUserInfo>,
    pub profile: Option<UserProfile>,
    pub redirect_to: Option<&'static str>,
}

impl SessionSnapshot {
    fn unauthenticated() -> Self {
        Self {
            user: None,
            profile: None,
            redirect_to: None,
        }
    }
}

/// Session/profile orchestration service.
#[derive(Clone)]
pub struct SessionService {
    db: RestStore,
    identity: IdentityClient,
    events: broadcast::Sender<AuthEvent>,
    subscribers: Arc<DashMap<u64, ()>>,
    next_subscriber_id: Arc<AtomicU64>,
}

impl SessionService {
    pub fn new(db: RestStore, identity: IdentityClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            identity,
            events,
            subscribers: Arc::new(DashMap::new()),
            next_subscriber_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Bootstrap a session: fetch the user behind the token, fetch their
    /// profile, and decide where the client should go from
    /// `current_path`.
    ///
    /// Fail-open: an invalid token or provider outage yields the
    /// unauthenticated snapshot rather than an error.
    pub async fn initialize(&self, access_token: Option<&str>, current_path: &str) -> SessionSnapshot {
        let Some(token) = access_token else {
            return SessionSnapshot::unauthenticated();
        };

        let user = match self.identity.get_user(token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session fetch failed, treating as signed out");
                return SessionSnapshot::unauthenticated();
            }
        };

        let profile = match self.db.get_profile(&user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Profile fetch failed, treating as absent");
                None
            }
        };

        let redirect_to = decide_redirect(profile.as_ref(), current_path);

        SessionSnapshot {
            user: Some(user),
            profile,
            redirect_to,
        }
    }

    /// Fetch the user's profile, creating the row on first sign-in.
    ///
    /// A missing row is the expected state for a brand-new account, not an
    /// error. New profiles start with `onboarding_completed=false` so the
    /// user is routed through the onboarding sequence.
    pub async fn ensure_profile(&self, user: &AuthUserInfo) -> Result<UserProfile, AppError> {
        if let Some(existing) = self.db.get_profile(&user.id).await? {
            return Ok(existing);
        }

        tracing::info!(user_id = %user.id, "Creating profile for first sign-in");

        let now = chrono::Utc::now().to_rfc3339();
        let profile = UserProfile {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_default(),
            home_airport: None,
            bucket_list: None,
            notification_preferences: None,
            onboarding_completed: false,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.insert_profile(&profile).await?;
        Ok(profile)
    }

    /// Record an auth state transition and fan it out to subscribers.
    ///
    /// Connected clients re-run their session bootstrap when they see an
    /// event for their user.
    pub fn on_auth_event(&self, event: AuthEvent) {
        tracing::info!(user_id = %event.user_id(), event = ?event, "Auth state changed");
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }

    /// Subscribe to auth events. The returned guard unsubscribes exactly
    /// once when dropped.
    pub fn subscribe(&self) -> SessionSubscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, ());

        SessionSubscription {
            id,
            receiver: self.events.subscribe(),
            registry: Arc::clone(&self.subscribers),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// A live auth-event subscription. Dropping it tears the subscription
/// down; there is no separate unsubscribe call to forget.
pub struct SessionSubscription {
    id: u64,
    receiver: broadcast::Receiver<AuthEvent>,
    registry: Arc<DashMap<u64, ()>>,
}

impl SessionSubscription {
    /// Wait for the next auth event. Returns `None` once the service is
    /// gone; a lagged subscriber skips to the oldest retained event.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> SessionService {
        SessionService::new(
            RestStore::new_mock(),
            IdentityClient::new("http://localhost:54321", "anon"),
        )
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_unauthenticated() {
        let service = test_service();
        let snapshot = service.initialize(None, "/").await;

        assert!(snapshot.user.is_none());
        assert!(snapshot.profile.is_none());
        assert!(snapshot.redirect_to.is_none());
    }

    #[tokio::test]
    async fn test_initialize_fails_open_on_provider_error() {
        // The mock identity endpoint is unreachable; the snapshot must
        // degrade to signed-out instead of erroring.
        let service = test_service();
        let snapshot = service.initialize(Some("some-token"), "/").await;

        assert!(snapshot.user.is_none());
        assert!(snapshot.redirect_to.is_none());
    }

    #[tokio::test]
    async fn test_subscription_delivers_events() {
        let service = test_service();
        let mut sub = service.subscribe();

        service.on_auth_event(AuthEvent::SignedIn {
            user_id: "user-1".to_string(),
        });

        let event = sub.recv().await.unwrap();
        assert_eq!(event.user_id(), "user-1");
    }

    #[tokio::test]
    async fn test_subscription_teardown_on_drop() {
        let service = test_service();
        assert_eq!(service.subscriber_count(), 0);

        let sub_a = service.subscribe();
        let sub_b = service.subscribe();
        assert_eq!(service.subscriber_count(), 2);

        drop(sub_a);
        assert_eq!(service.subscriber_count(), 1);
        drop(sub_b);
        assert_eq!(service.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_events_after_unsubscribe_do_not_reach_dropped_receiver() {
        let service = test_service();
        let sub = service.subscribe();
        drop(sub);

        // No subscribers left; send must not panic.
        service.on_auth_event(AuthEvent::SignedOut {
            user_id: "user-1".to_string(),
        });
        assert_eq!(service.subscriber_count(), 0);
    }
}
