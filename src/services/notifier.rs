// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WhatsApp notifications through the Twilio Messages API.

use crate::config::Config;
use crate::error::AppError;
use crate::models::LoadReport;
use serde::Deserialize;

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Twilio-backed WhatsApp sender.
#[derive(Clone)]
pub struct WhatsAppNotifier {
    http: reqwest::Client,
    api_url: String,
    credentials: Option<(String, String)>,
    from: String,
    fallback_to: Option<String>,
}

/// Created message (only the SID is used).
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

impl WhatsAppNotifier {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        let credentials = config
            .twilio_account_sid
            .clone()
            .zip(config.twilio_auth_token.clone());

        Self {
            http,
            api_url: config.twilio_api_url.trim_end_matches('/').to_string(),
            credentials,
            from: whatsapp_address(&config.twilio_whatsapp_from),
            fallback_to: config.notify_to_number.clone(),
        }
    }

    /// Pick the destination: the athlete's own number, else the configured one.
    pub fn destination(&self, athlete_phone: Option<&str>) -> Option<String> {
        athlete_phone
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.fallback_to.clone())
    }

    /// Send a message and return the Twilio message SID.
    pub async fn send(&self, to: &str, body: &str) -> Result<String, AppError> {
        let (account_sid, auth_token) = self
            .credentials
            .as_ref()
            .ok_or_else(|| AppError::Messaging("Twilio credentials not configured".to_string()))?;

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, account_sid
        );
        let to = whatsapp_address(to);

        let response = self
            .http
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&[
                ("From", self.from.as_str()),
                ("To", to.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| AppError::Messaging(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Messaging(format!("HTTP {}: {}", status, body)));
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| AppError::Messaging(format!("JSON parse error: {}", e)))?;

        tracing::info!(sid = %message.sid, "WhatsApp message sent");
        Ok(message.sid)
    }
}

/// Normalize a phone number to Twilio's `whatsapp:` address form.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, number)
    }
}

/// Message sent after an activity is scored.
pub fn format_activity_message(name: &str, trimp_score: f64, duration_min: f64) -> String {
    format!(
        "🚀 *Workout synced!*\n\n\
         🏃 Activity: *{}*\n\
         📊 Effort: *{} TRIMP*\n\
         ⏱️ Duration: {:.1} min\n\n\
         🔗 Check your progress on the dashboard!",
        name, trimp_score, duration_min
    )
}

/// Message carrying the current workload report and coaching text.
pub fn format_load_message(report: &LoadReport, coaching: &str) -> String {
    format!(
        "📈 *Training load report*\n\n\
         ACWR: *{:.2}*\n\
         Status: {}\n\n\
         {}",
        report.ratio, report.status, coaching
    )
}
