// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Optional integrations
//! (Twilio, the coaching LLM) stay disabled when their credentials are absent.

use std::env;
use uuid::Uuid;

/// Default Twilio WhatsApp sandbox sender.
pub const DEFAULT_WHATSAPP_FROM: &str = "whatsapp:+14155238886";

/// Default coaching model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS (dashboard)
    pub frontend_url: Option<String>,

    // --- Supabase ---
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: String,
    /// Service role key
    pub supabase_key: String,

    // --- Strava ---
    pub strava_client_id: String,
    pub strava_client_secret: String,
    /// Long-lived refresh token for the connected account
    pub strava_refresh_token: String,
    pub strava_api_url: String,
    pub strava_oauth_url: String,
    /// Webhook verification token (shared with the push subscription)
    pub webhook_verify_token: String,
    /// Athlete that owns activities whose Strava owner has no profile
    pub default_athlete_id: Option<Uuid>,

    // --- Twilio ---
    pub twilio_api_url: String,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_whatsapp_from: String,
    /// Destination used when the athlete has no phone number on file
    pub notify_to_number: Option<String>,

    // --- Coaching LLM (OpenAI-compatible) ---
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,

    /// JWT signing key for dashboard sessions (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_athlete_id = optional("DEFAULT_ATHLETE_ID")
            .map(|raw| {
                Uuid::parse_str(&raw).map_err(|_| ConfigError::Invalid("DEFAULT_ATHLETE_ID"))
            })
            .transpose()?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: optional("FRONTEND_URL"),

            supabase_url: required("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_key: required("SUPABASE_KEY")?,

            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            strava_refresh_token: required("STRAVA_REFRESH_TOKEN")?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth".to_string()),
            webhook_verify_token: required("WEBHOOK_VERIFY_TOKEN")?,
            default_athlete_id,

            twilio_api_url: env::var("TWILIO_API_URL")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            twilio_account_sid: optional("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: optional("TWILIO_AUTH_TOKEN"),
            twilio_whatsapp_from: env::var("TWILIO_WHATSAPP_FROM")
                .unwrap_or_else(|_| DEFAULT_WHATSAPP_FROM.to_string()),
            notify_to_number: optional("NOTIFY_TO_NUMBER"),

            llm_api_key: optional("OPENAI_API_KEY"),
            llm_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),

            jwt_signing_key: required("JWT_SIGNING_KEY")?.into_bytes(),
        })
    }

    /// Config for tests: every external URL points at localhost.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: Some("http://localhost:5173".to_string()),
            supabase_url: "http://127.0.0.1:1".to_string(),
            supabase_key: "test_service_key".to_string(),
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            strava_api_url: "http://127.0.0.1:1/api/v3".to_string(),
            strava_oauth_url: "http://127.0.0.1:1/oauth".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
            default_athlete_id: None,
            twilio_api_url: "http://127.0.0.1:1".to_string(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_whatsapp_from: DEFAULT_WHATSAPP_FROM.to_string(),
            notify_to_number: None,
            llm_api_key: None,
            llm_base_url: "http://127.0.0.1:1/v1".to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }
}

/// Read a required variable, trimming stray whitespace from secret bindings.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Read an optional variable; empty values count as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
