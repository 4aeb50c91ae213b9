// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hosted data API client with typed operations.
//!
//! The platform exposes tables over a PostgREST-style REST interface;
//! this wrapper provides high-level operations for:
//! - User profiles (onboarding state)
//! - Deals and deal tags (read-only)
//! - The likes counter RPC

use crate::db::tables;
use crate::error::AppError;
use crate::models::{Deal, DealTag, ProfilePatch, UserProfile};
use serde::Deserialize;
use std::sync::Arc;

/// PostgREST error code for "no rows returned by a single-row request".
/// A missing profile is a legitimate create-a-new-profile signal, not a
/// failure.
const NO_ROWS_CODE: &str = "PGRST116";

/// Error body shape returned by the data API.
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Canned rows served by a mock store.
#[derive(Debug, Default)]
pub struct MockRows {
    pub deals: Vec<Deal>,
    pub tags: Vec<DealTag>,
}

/// Hosted data store client.
#[derive(Clone)]
pub struct RestStore {
    http: Option<reqwest::Client>,
    base_url: String,
    api_key: String,
    mock: Option<Arc<MockRows>>,
}

impl RestStore {
    /// Create a new store client against the platform's data API.
    pub fn new(platform_url: &str, api_key: &str) -> Self {
        Self {
            http: Some(reqwest::Client::new()),
            base_url: format!("{}/rest/v1", platform_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            mock: None,
        }
    }

    /// Create a mock store client for testing (offline mode).
    ///
    /// All data operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            base_url: "http://offline.invalid/rest/v1".to_string(),
            api_key: String::new(),
            mock: None,
        }
    }

    /// Create a mock store serving canned rows for testing.
    ///
    /// Reads answer from the given rows; profile lookups report no row
    /// and writes succeed without storing anything.
    pub fn new_mock_with_rows(rows: MockRows) -> Self {
        Self {
            http: None,
            base_url: "http://offline.invalid/rest/v1".to_string(),
            api_key: String::new(),
            mock: Some(Arc::new(rows)),
        }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&reqwest::Client, AppError> {
        self.http
            .as_ref()
            .ok_or_else(|| AppError::Database("Store not connected (offline mode)".to_string()))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by identity-provider user id. Returns `None` when the
    /// row does not exist yet (first sign-in).
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        if self.mock.is_some() {
            return Ok(None);
        }

        let id_filter = format!("eq.{user_id}");
        let response = self
            .get_client()?
            .get(self.table_url(tables::USER_PROFILES))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.single_row(response).await
    }

    /// Create a profile row (first successful sign-in).
    pub async fn insert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        if self.mock.is_some() {
            return Ok(());
        }

        let response = self
            .get_client()?
            .post(self.table_url(tables::USER_PROFILES))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(profile)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_ok(response).await
    }

    /// Apply a partial update to a profile row. `updated_at` is always
    /// bumped alongside whatever fields the patch sets.
    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: &ProfilePatch,
    ) -> Result<(), AppError> {
        if self.mock.is_some() {
            return Ok(());
        }

        let mut body = serde_json::to_value(patch)
            .map_err(|e| AppError::Database(format!("Failed to serialize patch: {e}")))?;
        body.as_object_mut()
            .ok_or_else(|| AppError::Database("Patch must be an object".to_string()))?
            .insert(
                "updated_at".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );

        let response = self
            .get_client()?
            .patch(self.table_url(tables::USER_PROFILES))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{user_id}"))])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_ok(response).await
    }

    // ─── Deal Operations ─────────────────────────────────────────

    /// Fetch all deals, newest first. No pagination; every call re-fetches.
    pub async fn list_deals(&self) -> Result<Vec<Deal>, AppError> {
        if let Some(rows) = &self.mock {
            return Ok(rows.deals.clone());
        }

        let response = self
            .get_client()?
            .get(self.table_url(tables::DEALS))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.json_rows(response).await
    }

    /// Fetch the full tag set for joining onto deals.
    pub async fn list_deal_tags(&self) -> Result<Vec<DealTag>, AppError> {
        if let Some(rows) = &self.mock {
            return Ok(rows.tags.clone());
        }

        let response = self
            .get_client()?
            .get(self.table_url(tables::DEAL_TAGS))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.json_rows(response).await
    }

    /// Get one deal by id.
    pub async fn get_deal(&self, deal_id: &str) -> Result<Option<Deal>, AppError> {
        if let Some(rows) = &self.mock {
            return Ok(rows.deals.iter().find(|d| d.id == deal_id).cloned());
        }

        let id_filter = format!("eq.{deal_id}");
        let response = self
            .get_client()?
            .get(self.table_url(tables::DEALS))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.single_row(response).await
    }

    /// Fetch only the current likes counter for a deal.
    pub async fn get_deal_likes(&self, deal_id: &str) -> Result<i64, AppError> {
        #[derive(Deserialize)]
        struct LikesRow {
            likes: i64,
        }

        if let Some(rows) = &self.mock {
            return rows
                .deals
                .iter()
                .find(|d| d.id == deal_id)
                .map(|d| d.likes)
                .ok_or_else(|| AppError::NotFound(format!("Deal {deal_id} not found")));
        }

        let id_filter = format!("eq.{deal_id}");
        let response = self
            .get_client()?
            .get(self.table_url(tables::DEALS))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .query(&[("select", "likes"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let row: Option<LikesRow> = self.single_row(response).await?;
        row.map(|r| r.likes)
            .ok_or_else(|| AppError::NotFound(format!("Deal {deal_id} not found")))
    }

    /// Bump the likes counter through the store-side RPC.
    pub async fn increment_deal_likes(&self, deal_id: &str) -> Result<(), AppError> {
        if self.mock.is_some() {
            return Ok(());
        }

        let response = self
            .get_client()?
            .post(format!("{}/rpc/increment_deal_likes", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "deal_id": deal_id }))
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.check_ok(response).await
    }

    // ─── Response Handling ───────────────────────────────────────

    /// Parse a single-row response, mapping the store's "no rows" code to
    /// `None`.
    async fn single_row<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>, AppError> {
        if response.status().is_success() {
            let row = response
                .json::<T>()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(Some(row));
        }

        let status = response.status();
        let body: StoreErrorBody = response.json().await.unwrap_or(StoreErrorBody {
            code: None,
            message: None,
        });

        if body.code.as_deref() == Some(NO_ROWS_CODE) {
            return Ok(None);
        }

        Err(AppError::Database(format!(
            "Store request failed ({status}): {}",
            body.message.unwrap_or_default()
        )))
    }

    async fn json_rows<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<T>, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Database(format!(
                "Store request failed ({status}): {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn check_ok(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Database(format!(
            "Store request failed ({status}): {body}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_store_returns_database_error() {
        let store = RestStore::new_mock();
        let err = store.get_profile("user-1").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_mock_rows_serve_reads_and_absorb_writes() {
        let store = RestStore::new_mock_with_rows(MockRows {
            deals: vec![],
            tags: vec![],
        });

        assert!(store.get_deal("missing").await.unwrap().is_none());
        assert!(store.get_profile("user-1").await.unwrap().is_none());
        assert!(store.list_deals().await.unwrap().is_empty());
        store
            .update_profile("user-1", &ProfilePatch::default())
            .await
            .unwrap();
    }

    #[test]
    fn test_no_rows_error_body_parses() {
        let body: StoreErrorBody = serde_json::from_str(
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned","details":null}"#,
        )
        .unwrap();
        assert_eq!(body.code.as_deref(), Some(NO_ROWS_CODE));
    }
}
