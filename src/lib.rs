// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Farehawk: flight-deal discovery API server.
//!
//! This crate provides the backend API for the Farehawk web app: session
//! bootstrap against the hosted identity provider, onboarding profile
//! writes, and deal listing sourced from the hosted data store.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redirect;
pub mod routes;
pub mod services;

use config::Config;
use db::RestStore;
use services::{IdentityClient, SessionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: RestStore,
    pub identity: IdentityClient,
    pub sessions: SessionService,
}
