//! Deterministic stand-ins for the ML service's forecasts.
//!
//! Every generator is a pure function of its normalized request and an immutable profile of
//! constants. Nothing here touches the network or the clock.

pub mod growth;
pub mod jobs;
pub mod sentiment;

pub use growth::GrowthProfile;
pub use jobs::JobsProfile;
pub use sentiment::SentimentProfile;

/// Last observed year; forecasts start the year after.
pub const BASE_YEAR: i32 = 2023;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackProfile {
    pub growth: GrowthProfile,
    pub jobs: JobsProfile,
    pub sentiment: SentimentProfile,
}

fn resolve_industries(requested: &[String], defaults: &[String]) -> Vec<String> {
    if requested.is_empty() {
        defaults.to_vec()
    } else {
        requested.to_vec()
    }
}

fn to_strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
