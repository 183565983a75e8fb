// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TRIMP (Training Impulse) calculation.
//!
//! Banister's heart-rate-reserve weighted score:
//!
//! ```text
//! hrr   = (avg_hr - resting_hr) / (max_hr - resting_hr)
//! trimp = minutes * hrr * 0.64 * e^(k * hrr)
//! ```
//!
//! `k` depends on sex (1.92 male, 1.67 female). This is the only place the
//! formula lives; everything that scores an activity calls [`calculate_trimp`].

use crate::models::Sex;

/// Scaling factor of the exponential weighting.
const WEIGHTING_FACTOR: f64 = 0.64;

/// Errors for heart-rate inputs that cannot produce a score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrimpError {
    #[error("max heart rate ({max_hr}) must be greater than resting heart rate ({resting_hr})")]
    EmptyReserve { resting_hr: f64, max_hr: f64 },

    #[error("non-finite input: {0}")]
    NonFinite(&'static str),
}

/// Physiological parameters of one athlete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateProfile {
    pub resting_hr: f64,
    pub max_hr: f64,
    pub sex: Sex,
}

impl HeartRateProfile {
    /// Heart-rate reserve fraction for an average heart rate.
    ///
    /// Values below resting HR give a negative fraction; this is not clamped.
    pub fn reserve_fraction(&self, average_hr: f64) -> Result<f64, TrimpError> {
        if !average_hr.is_finite() {
            return Err(TrimpError::NonFinite("average_hr"));
        }
        if !self.resting_hr.is_finite() || !self.max_hr.is_finite() {
            return Err(TrimpError::NonFinite("heart rate profile"));
        }
        let reserve = self.max_hr - self.resting_hr;
        if reserve <= 0.0 {
            return Err(TrimpError::EmptyReserve {
                resting_hr: self.resting_hr,
                max_hr: self.max_hr,
            });
        }
        Ok((average_hr - self.resting_hr) / reserve)
    }
}

/// Score a session, rounded to two decimals.
pub fn calculate_trimp(
    duration_min: f64,
    average_hr: f64,
    profile: &HeartRateProfile,
) -> Result<f64, TrimpError> {
    if !duration_min.is_finite() {
        return Err(TrimpError::NonFinite("duration_min"));
    }
    let hrr = profile.reserve_fraction(average_hr)?;
    let k = profile.sex.intensity_constant();
    let score = duration_min * hrr * WEIGHTING_FACTOR * (k * hrr).exp();
    Ok(round2(score))
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
