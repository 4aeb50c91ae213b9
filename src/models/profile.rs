//! User profile model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// An airport a user can pick as their home departure point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Airport {
    /// IATA code (e.g. "LHR")
    pub code: String,
    /// Full airport name
    pub name: String,
    pub city: String,
    pub country: String,
    /// Shown in the default (unsearched) picker list
    #[serde(default)]
    pub popular: bool,
}

/// Notification channel preferences chosen during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            sms: false,
        }
    }
}

/// User profile stored in the hosted data store (`user_profiles` table).
///
/// Created on first sign-in; mutated by the onboarding steps. Rows written
/// by early app versions stored `home_airport` as a bare city string, so
/// deserialization accepts both shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Identity-provider user id (also the row key)
    pub id: String,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_home_airport")]
    pub home_airport: Option<Airport>,
    /// Comma-joined destination names from the preferences step
    #[serde(default)]
    pub bucket_list: Option<String>,
    #[serde(default)]
    pub notification_preferences: Option<NotificationPreferences>,
    /// Gates routing between the onboarding steps and the dashboard
    #[serde(default)]
    pub onboarding_completed: bool,
    /// ISO 8601
    pub created_at: String,
    /// ISO 8601
    pub updated_at: String,
}

impl UserProfile {
    /// City used to prioritize the deal sort, if a home airport is set.
    pub fn home_city(&self) -> Option<&str> {
        self.home_airport.as_ref().map(|a| a.city.as_str())
    }
}

/// Accept either the structured `Airport` object or a legacy bare city
/// string (older rows stored only the city name).
fn deserialize_home_airport<'de, D>(deserializer: D) -> Result<Option<Airport>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Structured(Airport),
        City(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Structured(airport)) => Some(airport),
        Some(Raw::City(city)) if !city.is_empty() => Some(Airport {
            code: String::new(),
            name: String::new(),
            city,
            country: String::new(),
            popular: false,
        }),
        _ => None,
    })
}

/// Partial update applied to a profile row by the onboarding steps.
///
/// Only set fields are sent; `updated_at` is always bumped by the store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_airport: Option<Airport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<NotificationPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}
