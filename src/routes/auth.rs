// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes: OAuth start/callback, magic link, logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{Claims, REFRESH_COOKIE, SESSION_COOKIE};
use crate::models::AuthEvent;
use crate::redirect::{decide_redirect, ONBOARDING_PATH};
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/magic-link", post(magic_link))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to the provider's Google authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback_url = format!("{}/auth/callback", service_base_url(&headers));

    let auth_url = state
        .identity
        .authorize_url("google", &callback_url, &oauth_state);

    tracing::info!(frontend_url = %frontend_url, "Starting OAuth flow, redirecting to provider");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth/magic-link callback: exchange the code for a session, create the
/// profile if this is a first sign-in, and send the browser to wherever
/// the onboarding state says it belongs.
///
/// Every failure path degrades to a redirect back to the frontend root.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    // Decode and verify frontend URL from the state parameter
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!("Missing or tampered state parameter, using default frontend URL");
            state.config.frontend_url.clone()
        });

    // Check for OAuth errors from the provider
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from provider");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return (jar, Redirect::temporary(&redirect));
    }

    let Some(code) = params.code else {
        tracing::warn!("Callback without code, redirecting home");
        return (jar, Redirect::temporary(&frontend_url));
    };

    match complete_sign_in(&state, &code).await {
        Ok((session, target)) => {
            let secure = frontend_url.starts_with("https://");
            let redirect = format!("{}{}", frontend_url, target);
            let jar = jar
                .add(session_cookie(
                    session.access_token,
                    secure,
                    session.expires_in,
                ))
                .add(refresh_cookie(session.refresh_token, secure));
            (jar, Redirect::temporary(&redirect))
        }
        Err(e) => {
            tracing::error!(error = %e, "Sign-in failed, redirecting home");
            (jar, Redirect::temporary(&frontend_url))
        }
    }
}

/// Exchange the code, ensure a profile row exists, and pick the redirect
/// target. Returns the provider session and the frontend path.
async fn complete_sign_in(
    state: &Arc<AppState>,
    code: &str,
) -> Result<(crate::services::ProviderSession, &'static str)> {
    let session = state.identity.exchange_code(code).await?;

    tracing::info!(user_id = %session.user.id, "Code exchange successful");

    let profile = state.sessions.ensure_profile(&session.user).await?;

    state.sessions.on_auth_event(AuthEvent::SignedIn {
        user_id: session.user.id.clone(),
    });

    // The callback path is public, so this always yields a target.
    let target = decide_redirect(Some(&profile), "/auth/callback").unwrap_or(ONBOARDING_PATH);

    Ok((session, target))
}

// ─── Session Refresh ─────────────────────────────────────────

/// Rotate the provider session using the refresh-token cookie. The SPA
/// calls this when its access token nears expiry; both cookies are
/// replaced with the rotated pair.
async fn refresh(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<(CookieJar, StatusCode)> {
    let Some(cookie) = jar.get(REFRESH_COOKIE) else {
        return Err(AppError::Unauthorized);
    };

    let session = state.identity.refresh_session(cookie.value()).await?;

    tracing::info!(user_id = %session.user.id, "Session refreshed");
    state.sessions.on_auth_event(AuthEvent::TokenRefreshed {
        user_id: session.user.id.clone(),
    });

    let secure = state.config.frontend_url.starts_with("https://");
    let jar = jar
        .add(session_cookie(
            session.access_token,
            secure,
            session.expires_in,
        ))
        .add(refresh_cookie(session.refresh_token, secure));

    Ok((jar, StatusCode::NO_CONTENT))
}

// ─── Magic Link ──────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct MagicLinkRequest {
    #[validate(length(min = 1, message = "Please enter your email"))]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

#[derive(Serialize)]
pub struct MagicLinkResponse {
    pub message: String,
}

/// Confirmation text the sign-in page shows after a successful send.
const MAGIC_LINK_SENT: &str = "Check your email for the magic link!";

/// Send a passwordless sign-in link. The account is created on the fly
/// for first-time emails; no navigation happens until the link is opened.
async fn magic_link(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<MagicLinkResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(validation_message(&e)))?;

    let redirect_to = format!("{}/auth/callback", state.config.frontend_url);
    state
        .identity
        .send_magic_link(&request.email, &redirect_to)
        .await?;

    tracing::info!("Magic link sent");

    Ok(Json(MagicLinkResponse {
        message: MAGIC_LINK_SENT.to_string(),
    }))
}

/// First human-readable message out of a validation error set.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}

// ─── Logout ──────────────────────────────────────────────────

/// Sign out: best-effort provider session invalidation, then clear the
/// session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();

        if let Err(e) = state.identity.sign_out(&token).await {
            tracing::warn!(error = %e, "Provider sign-out failed, clearing cookie anyway");
        }

        // Decode locally just to know who signed out; an expired token
        // still clears fine.
        let key = jsonwebtoken::DecodingKey::from_secret(&state.config.jwt_signing_key);
        if let Ok(data) =
            jsonwebtoken::decode::<Claims>(&token, &key, &jsonwebtoken::Validation::default())
        {
            state.sessions.on_auth_event(AuthEvent::SignedOut {
                user_id: data.claims.sub,
            });
        }
    }

    let secure = state.config.frontend_url.starts_with("https://");
    let jar = jar
        .add(removal_cookie(SESSION_COOKIE, secure))
        .add(removal_cookie(REFRESH_COOKIE, secure));
    (jar, StatusCode::NO_CONTENT)
}

// ─── Cookies ─────────────────────────────────────────────────

fn session_cookie(token: String, secure: bool, max_age_secs: u64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs as i64))
        .build()
}

/// Refresh tokens rotate on use; the cookie lives long enough to cover
/// the provider's rotation window.
fn refresh_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(30))
        .build()
}

/// Removal cookie with attributes matching the creation attributes, so
/// browsers actually drop it.
fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

// ─── OAuth State Signing ─────────────────────────────────────

/// Sign the frontend URL and a timestamp into the OAuth state parameter.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Data payload: "frontend_url|timestamp_hex"
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    // "payload|signature_hex", base64url-encoded for the URL
    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and decode the frontend URL from the OAuth
/// state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

/// Derive this service's externally visible base URL from the Host
/// header (for the OAuth callback URL).
fn service_base_url(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}", scheme, host)
}
