// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flight deal models for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A flight deal row from the hosted store (`deals` table).
///
/// Deals are read-only from this service's point of view except for the
/// likes counter, which is bumped through a store-side RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Deal {
    pub id: String,
    pub destination: String,
    pub country: String,
    /// Emoji flag for the destination country
    pub flag: String,
    pub image_url: String,
    /// Price in euros
    pub price: i64,
    pub original_price: i64,
    /// Percentage off the original price
    pub discount: i64,
    /// Departure description, e.g. "London (LHR)"
    pub departure: String,
    pub stops: String,
    #[serde(default)]
    pub cabin_type: Option<String>,
    #[serde(default)]
    pub sample_dates: Option<String>,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default)]
    pub flight_duration: Option<String>,
    pub posted_by: String,
    pub posted_by_avatar: String,
    #[serde(default)]
    pub posted_by_description: Option<String>,
    pub likes: i64,
    /// Booking link
    pub url: String,
    #[serde(default)]
    pub deal_screenshot_url: Option<String>,
    /// ISO 8601; listing ties sort by this, newest first
    pub created_at: String,
    #[serde(default)]
    pub is_hot: bool,
}

/// A tag row from `deal_tags`, joined onto deals by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealTag {
    pub deal_id: String,
    pub tag: String,
}

/// Deal enriched for the listing response.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DealWithTags {
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(flatten))]
    pub deal: Deal,
    pub tags: Vec<String>,
    /// Whether the departure matches the user's home airport city
    pub from_home_airport: bool,
}
