// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod athlete;
pub mod load;
pub mod webhook_event;

pub use activity::{Activity, ActivitySource, NewActivity, ScoredSession};
pub use athlete::{AthleteProfile, NewAthleteProfile, Sex};
pub use load::{LoadReport, LoadStatus};
pub use webhook_event::{QueuedEvent, StravaEvent};
