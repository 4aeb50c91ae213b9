// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod deals;
pub mod identity;
pub mod session;

pub use deals::LikeCounter;
pub use identity::{AuthUserInfo, IdentityClient, ProviderSession};
pub use session::{SessionService, SessionSnapshot, SessionSubscription};
