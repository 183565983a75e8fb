//! Database layer (Supabase PostgREST).

pub mod supabase;

pub use supabase::SupabaseDb;

/// Table names as constants.
pub mod tables {
    pub const ATHLETE_PROFILES: &str = "athlete_profiles";
    pub const ACTIVITIES: &str = "activities";
    /// Raw Strava events queued by the hosted edge function
    pub const WEBHOOK_EVENTS: &str = "webhook_events";
}

/// Column used to deduplicate Strava deliveries on upsert.
pub const ACTIVITY_CONFLICT_KEY: &str = "strava_activity_id";
