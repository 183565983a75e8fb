// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod coach;
pub mod load;
pub mod notifier;
pub mod queue;
pub mod strava;
pub mod sync;
pub mod trimp;

pub use activity::ActivityProcessor;
pub use coach::CoachService;
pub use notifier::WhatsAppNotifier;
pub use strava::StravaService;
