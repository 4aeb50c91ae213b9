// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Redirect decision for signed-in users.
//!
//! All routing-after-auth logic lives in this one pure function so the
//! auth callback, the session bootstrap endpoint, and the tests agree on
//! a single rule set.

use crate::models::UserProfile;

/// Paths a signed-in user may land on without being forced elsewhere
/// yet. Everything else is behind the onboarding gate.
pub const PUBLIC_PATHS: &[&str] = &["/", "/signin", "/auth/callback"];

/// Entry point of the onboarding sequence.
pub const ONBOARDING_PATH: &str = "/onboarding";

/// Main deal listing.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Decide where a signed-in user should be sent, if anywhere.
///
/// A missing profile means the row has not been created yet; the user
/// still needs onboarding. Non-public paths are never redirected from, so
/// a user already inside the onboarding sequence (or the dashboard) stays
/// put.
pub fn decide_redirect(profile: Option<&UserProfile>, current_path: &str) -> Option<&'static str> {
    if !is_public_path(current_path) {
        return None;
    }

    match profile {
        Some(p) if p.onboarding_completed => Some(DASHBOARD_PATH),
        _ => Some(ONBOARDING_PATH),
    }
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}
