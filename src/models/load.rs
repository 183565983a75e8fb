// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Acute:chronic workload ratio (ACWR) report.
//!
//! Bands are contiguous over the non-negative reals:
//!
//! | ratio           | status        |
//! |-----------------|---------------|
//! | r < 0.8         | undertraining |
//! | 0.8 <= r <= 1.3 | safe zone     |
//! | 1.3 < r <= 1.5  | moderate risk |
//! | r > 1.5         | high risk     |

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNDERTRAINING_BELOW: f64 = 0.8;
pub const SAFE_UP_TO: f64 = 1.3;
pub const MODERATE_UP_TO: f64 = 1.5;

/// Risk classification of a workload ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// No chronic load yet; the ratio is meaningless.
    InsufficientHistory,
    Undertraining,
    SafeZone,
    ModerateRisk,
    HighRisk,
}

impl LoadStatus {
    /// Classify a (rounded) ratio.
    pub fn classify(ratio: f64) -> Self {
        if ratio < UNDERTRAINING_BELOW {
            LoadStatus::Undertraining
        } else if ratio <= SAFE_UP_TO {
            LoadStatus::SafeZone
        } else if ratio <= MODERATE_UP_TO {
            LoadStatus::ModerateRisk
        } else {
            LoadStatus::HighRisk
        }
    }

    /// Human-readable status line.
    pub fn message(self) -> &'static str {
        match self {
            LoadStatus::InsufficientHistory => "Building training history...",
            LoadStatus::Undertraining => "UNDERTRAINING (room to push harder)",
            LoadStatus::SafeZone => "SAFE ZONE (steady, safe progression)",
            LoadStatus::ModerateRisk => "CAUTION (moderate injury risk)",
            LoadStatus::HighRisk => "DANGER (high injury risk, rest up)",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Rolling load snapshot for one athlete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Mean daily TRIMP over the last 7 days
    pub acute_load: f64,
    /// Mean daily TRIMP over the last 28 days
    pub chronic_load: f64,
    /// Rounded acute/chronic ratio (1.0 without history)
    pub ratio: f64,
    pub status: LoadStatus,
}
