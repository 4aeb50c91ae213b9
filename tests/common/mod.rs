// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use farehawk::config::Config;
use farehawk::db::{MockRows, RestStore};
use farehawk::middleware::auth::Claims;
use farehawk::routes::create_router;
use farehawk::services::{IdentityClient, SessionService};
use farehawk::AppState;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Create a mock store connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> RestStore {
    RestStore::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_inner(Config::test_default(), test_db_offline())
}

/// Create a test app whose store serves canned rows.
#[allow(dead_code)]
pub fn create_test_app_with_rows(rows: MockRows) -> (axum::Router, Arc<AppState>) {
    create_test_app_inner(Config::test_default(), RestStore::new_mock_with_rows(rows))
}

/// Create a test app with a specific frontend URL (cookie attribute
/// tests exercise localhost vs production).
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_inner(config, test_db_offline())
}

fn create_test_app_inner(config: Config, db: RestStore) -> (axum::Router, Arc<AppState>) {
    let identity = IdentityClient::new(&config.platform_url, &config.platform_anon_key);
    let sessions = SessionService::new(db.clone(), identity.clone());

    let state = Arc::new(AppState {
        config,
        db,
        identity,
        sessions,
    });

    (create_router(state.clone()), state)
}

/// Create a session JWT as the identity provider would issue it.
#[allow(dead_code)]
pub fn session_token_for(user_id: &str, config: &Config) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: Some("user@example.com".to_string()),
        exp: now + 86400,
        iat: now,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(&config.jwt_signing_key),
    )
    .unwrap()
}
