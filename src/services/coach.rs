// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coaching text from an OpenAI-compatible chat completions endpoint.
//!
//! Coaching is best effort: without an API key, or on any error, a fixed
//! fallback message built from the report is returned instead.

use crate::config::Config;
use crate::error::AppError;
use crate::models::LoadReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are an Olympic-level triathlon coach.";

/// Request timeout for the completion call
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// LLM coaching client.
#[derive(Clone)]
pub struct CoachService {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl CoachService {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            api_key: config.llm_api_key.clone(),
        }
    }

    /// Coaching message for an athlete, falling back to a canned one.
    pub async fn coaching_message(&self, athlete_name: &str, report: &LoadReport) -> String {
        match self.request_completion(athlete_name, report).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Coaching LLM unavailable, using fallback");
                fallback_message(athlete_name, report)
            }
        }
    }

    async fn request_completion(
        &self,
        athlete_name: &str,
        report: &LoadReport,
    ) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Llm("API key not configured".to_string()))?;

        let prompt = build_prompt(athlete_name, report);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("JSON parse error: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::Llm("Empty completion".to_string()))
    }
}

/// User prompt for the coaching request.
pub fn build_prompt(athlete_name: &str, report: &LoadReport) -> String {
    format!(
        "You are an elite triathlon coach.\n\
         Your athlete {} has an ACWR (Acute:Chronic Workload Ratio) of {}.\n\
         Current status: {}.\n\n\
         Write a short WhatsApp message for them (at most 3 sentences):\n\
         1. Explain what the number means.\n\
         2. Give a practical training recommendation for tomorrow.\n\
         3. Keep the tone motivating but professional.",
        athlete_name, report.ratio, report.status
    )
}

/// Canned coaching text used when the LLM cannot be reached.
pub fn fallback_message(athlete_name: &str, report: &LoadReport) -> String {
    format!(
        "Coach says: Hi {}! Your ratio is {}. {}. Stay focused on the plan!",
        athlete_name, report.ratio, report.status
    )
}
