// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete profile model.

use crate::services::trimp::HeartRateProfile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Biological sex, used only to pick the TRIMP intensity constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Exponential weighting constant `k` of the TRIMP formula.
    pub fn intensity_constant(self) -> f64 {
        match self {
            Sex::Male => 1.92,
            Sex::Female => 1.67,
        }
    }
}

/// Athlete profile stored in the `athlete_profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Primary key
    pub id: Uuid,
    pub name: String,
    pub sex: Sex,
    /// Resting heart rate (bpm)
    pub resting_hr: f64,
    /// Maximum heart rate (bpm)
    pub max_hr: f64,
    /// Linked Strava athlete ID
    pub strava_athlete_id: Option<u64>,
    /// Whether the coaching subscription is active
    #[serde(default)]
    pub subscription_active: bool,
    /// WhatsApp destination (E.164)
    pub phone_number: Option<String>,
}

impl AthleteProfile {
    pub fn heart_rate_profile(&self) -> HeartRateProfile {
        HeartRateProfile {
            resting_hr: self.resting_hr,
            max_hr: self.max_hr,
            sex: self.sex,
        }
    }
}

/// Insert payload for a new athlete (the database assigns the ID).
#[derive(Debug, Clone, Serialize)]
pub struct NewAthleteProfile {
    pub name: String,
    pub sex: Sex,
    pub resting_hr: f64,
    pub max_hr: f64,
    pub strava_athlete_id: Option<u64>,
    pub subscription_active: bool,
    pub phone_number: Option<String>,
}
