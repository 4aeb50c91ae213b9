// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod deal;
pub mod events;
pub mod profile;

pub use deal::{Deal, DealTag, DealWithTags};
pub use events::AuthEvent;
pub use profile::{Airport, NotificationPreferences, ProfilePatch, UserProfile};
