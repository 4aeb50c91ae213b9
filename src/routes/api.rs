// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: session bootstrap, onboarding
//! profile writes, deal listing, and the catalogs.

use crate::catalog;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Airport, AuthEvent, DealWithTags, NotificationPreferences, ProfilePatch, UserProfile};
use crate::services::identity::AuthUserInfo;
use crate::services::{deals, SessionSnapshot};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Extension, Json, Router,
};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via the session token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/session/events", get(session_events))
        .route("/api/me", get(get_me))
        .route("/api/me/home-airport", put(put_home_airport))
        .route("/api/me/bucket-list", put(put_bucket_list))
        .route("/api/me/notifications", put(put_notifications))
        .route("/api/deals", get(get_deals))
        .route("/api/deals/{id}", get(get_deal))
        .route("/api/deals/{id}/like", post(like_deal))
        .route("/api/airports", get(get_airports))
        .route("/api/destinations", get(get_destinations))
}

// ─── Session ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct SessionQuery {
    /// Client-side path the SPA is currently on
    #[serde(default)]
    path: Option<String>,
}

/// Session bootstrap: who am I, what is my profile, and where should the
/// client navigate from its current path. The SPA calls this on mount and
/// again on every auth event it sees.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SessionQuery>,
) -> Json<SessionSnapshot> {
    let path = query.path.as_deref().unwrap_or("/");
    let snapshot = state
        .sessions
        .initialize(Some(&user.access_token), path)
        .await;
    Json(snapshot)
}

/// Auth-event stream. Each event is a hint for the client to re-run its
/// session bootstrap; the subscription is torn down when the connection
/// drops.
async fn session_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let subscription = state.sessions.subscribe();

    let stream = futures_util::stream::unfold(subscription, |mut sub| async move {
        match sub.recv().await {
            Some(auth_event) => {
                let event = Event::default()
                    .event("auth")
                    .json_data(&auth_event)
                    .unwrap_or_default();
                Some((Ok(event), sub))
            }
            None => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ─── User Profile / Onboarding ───────────────────────────────

/// Where the client goes after a successful onboarding step.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OnboardingStepResponse {
    pub next: &'static str,
}

/// Get the current user's profile, creating the row on first sign-in.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .sessions
        .ensure_profile(&AuthUserInfo {
            id: user.user_id,
            email: user.email,
        })
        .await?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
struct HomeAirportRequest {
    airport: Airport,
}

/// Save the home-airport selection and advance to the preferences step.
/// The submitted code must resolve against the catalog; the canonical
/// catalog entry is what gets stored.
async fn put_home_airport(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<HomeAirportRequest>,
) -> Result<Json<OnboardingStepResponse>> {
    let airport = catalog::airport_by_code(&request.airport.code).ok_or_else(|| {
        AppError::BadRequest("Please select your home airport".to_string())
    })?;

    let patch = ProfilePatch {
        home_airport: Some(airport),
        ..Default::default()
    };
    state.db.update_profile(&user.user_id, &patch).await?;

    state.sessions.on_auth_event(AuthEvent::ProfileUpdated {
        user_id: user.user_id,
    });

    Ok(Json(OnboardingStepResponse {
        next: "/preferences",
    }))
}

#[derive(Deserialize)]
struct BucketListRequest {
    /// Destination catalog ids, resolved to names server-side
    destinations: Vec<String>,
}

/// Save the bucket-list selection and advance to the notifications step.
async fn put_bucket_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BucketListRequest>,
) -> Result<Json<OnboardingStepResponse>> {
    let patch = ProfilePatch {
        bucket_list: Some(catalog::bucket_list_text(&request.destinations)),
        ..Default::default()
    };
    state.db.update_profile(&user.user_id, &patch).await?;

    state.sessions.on_auth_event(AuthEvent::ProfileUpdated {
        user_id: user.user_id,
    });

    Ok(Json(OnboardingStepResponse {
        next: "/notifications",
    }))
}

#[derive(Deserialize)]
struct NotificationsRequest {
    preferences: NotificationPreferences,
}

/// Save notification preferences and finish onboarding; the completion
/// flag flips here and routing opens up to the dashboard.
async fn put_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NotificationsRequest>,
) -> Result<Json<OnboardingStepResponse>> {
    let patch = ProfilePatch {
        notification_preferences: Some(request.preferences),
        onboarding_completed: Some(true),
        ..Default::default()
    };
    state.db.update_profile(&user.user_id, &patch).await?;

    state.sessions.on_auth_event(AuthEvent::ProfileUpdated {
        user_id: user.user_id,
    });

    Ok(Json(OnboardingStepResponse { next: "/dashboard" }))
}

// ─── Deals ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct DealsQuery {
    /// Override the departure-city filter (defaults to the profile's
    /// home airport city)
    #[serde(default)]
    city: Option<String>,
}

/// Full deal listing with tags, sorted home-airport-first.
async fn get_deals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DealsQuery>,
) -> Result<Json<Vec<DealWithTags>>> {
    let listing = deals::list_for_user(&state.db, &user.user_id, query.city.as_deref()).await?;
    Ok(Json(listing))
}

/// One deal by id; unknown ids get a 404 the client renders as its
/// "Deal not found" state.
async fn get_deal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DealWithTags>> {
    match deals::get(&state.db, &id).await? {
        Some(deal) => Ok(Json(deal)),
        None => Err(AppError::NotFound("Deal not found".to_string())),
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LikeResponse {
    pub likes: i64,
}

/// Bump the likes counter; the response carries the authoritative count
/// the client settles its optimistic value on.
async fn like_deal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    let likes = deals::like(&state.db, &id).await?;
    Ok(Json(LikeResponse { likes }))
}

// ─── Catalogs ────────────────────────────────────────────────

#[derive(Deserialize)]
struct AirportsQuery {
    #[serde(default)]
    q: Option<String>,
}

/// Airport picker search. Empty query lists the popular set.
async fn get_airports(Query(query): Query<AirportsQuery>) -> Json<Vec<Airport>> {
    Json(catalog::search_airports(query.q.as_deref().unwrap_or("")))
}

/// Bucket-list destination catalog.
async fn get_destinations() -> Json<&'static [catalog::Destination]> {
    Json(catalog::destinations())
}
