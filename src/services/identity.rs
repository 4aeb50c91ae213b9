// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hosted identity provider client.
//!
//! Handles:
//! - OAuth authorize-URL construction (Google)
//! - Authorization code exchange after the provider redirects back
//! - Passwordless magic-link sign-in
//! - Session lookup and sign-out
//!
//! Sessions themselves (token issuance, refresh, persistence) are owned
//! entirely by the provider; this client only consumes its API.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Identity attributes this app consumes from a provider session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUserInfo {
    pub id: String,
    pub email: Option<String>,
}

/// Session returned by the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: AuthUserInfo,
}

impl IdentityClient {
    /// Create a new client against the platform's auth endpoint.
    pub fn new(platform_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/auth/v1", platform_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    /// Build the OAuth authorize URL the browser is redirected to.
    ///
    /// `redirect_to` must be this service's callback endpoint; the signed
    /// state rides along so the callback knows the post-login target.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str, state: &str) -> String {
        format!(
            "{}/authorize?provider={}&redirect_to={}&access_type=offline&prompt=consent&state={}",
            self.base_url,
            provider,
            urlencoding::encode(redirect_to),
            urlencoding::encode(state),
        )
    }

    /// Exchange the authorization code from the callback for a session.
    pub async fn exchange_code(&self, code: &str) -> Result<ProviderSession, AppError> {
        let response = self
            .http
            .post(format!("{}/token?grant_type=pkce", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "auth_code": code }))
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Code exchange failed: {e}")))?;

        self.check_response_json(response).await
    }

    /// Rotate a session with the refresh-token grant. The provider
    /// returns a fresh access token and a new refresh token; the old
    /// refresh token is spent.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<ProviderSession, AppError> {
        let response = self
            .http
            .post(format!("{}/token?grant_type=refresh_token", self.base_url))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Session refresh failed: {e}")))?;

        self.check_response_json(response).await
    }

    /// Send a passwordless magic link. Creates the account if it does not
    /// exist yet.
    pub async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/otp", self.base_url))
            .header("apikey", &self.api_key)
            .json(&magic_link_payload(email, redirect_to))
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Magic link request failed: {e}")))?;

        self.check_response(response).await
    }

    /// Fetch the user behind an access token (session lookup).
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUserInfo, AppError> {
        let response = self
            .http
            .get(format!("{}/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Invalidate the provider session.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        self.check_response(response).await
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            return Err(AppError::InvalidToken);
        }

        Err(AppError::AuthProvider(format!(
            "Provider request failed ({status}): {body}"
        )))
    }

    /// Generic success check with JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::InvalidToken);
            }

            return Err(AppError::AuthProvider(format!(
                "Provider request failed ({status}): {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))
    }
}

/// Request body for the magic-link endpoint. `create_user` stays true so
/// a first-time email gets an account on the spot.
fn magic_link_payload(email: &str, redirect_to: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "create_user": true,
        "options": {
            "email_redirect_to": redirect_to,
        }
    })
}
