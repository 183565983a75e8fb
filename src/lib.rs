// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TRIMP Tracker: training-load tracking for Strava athletes.
//!
//! This crate receives Strava activity webhooks, scores each session with
//! the TRIMP (Training Impulse) formula, stores the result in Supabase and
//! reports the acute:chronic workload ratio over WhatsApp and a JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::SupabaseDb;
use services::{CoachService, StravaService, WhatsAppNotifier};

/// Shared application state.
///
/// Every client is constructed once at startup and handed to the request
/// handlers through this struct.
pub struct AppState {
    pub config: Config,
    pub db: SupabaseDb,
    pub strava_service: StravaService,
    pub notifier: WhatsAppNotifier,
    pub coach: CoachService,
}

impl AppState {
    /// Build all clients from configuration.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();

        let db = SupabaseDb::new(http.clone(), &config.supabase_url, &config.supabase_key);
        let strava_service = StravaService::new(http.clone(), &config);
        let notifier = WhatsAppNotifier::new(http.clone(), &config);
        let coach = CoachService::new(http, &config);

        Self {
            config,
            db,
            strava_service,
            notifier,
            coach,
        }
    }
}
