//! Auth state-change events emitted by the identity provider flows.

use serde::{Deserialize, Serialize};

/// An auth state transition the rest of the app can react to.
///
/// Emitted by the OAuth callback, magic-link completion, and logout
/// handlers, and fanned out to session subscribers so a connected client
/// can re-run its session bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn { user_id: String },
    SignedOut { user_id: String },
    TokenRefreshed { user_id: String },
    ProfileUpdated { user_id: String },
}

impl AuthEvent {
    pub fn user_id(&self) -> &str {
        match self {
            AuthEvent::SignedIn { user_id }
            | AuthEvent::SignedOut { user_id }
            | AuthEvent::TokenRefreshed { user_id }
            | AuthEvent::ProfileUpdated { user_id } => user_id,
        }
    }
}
