use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResponse {
    pub items: Vec<GrowthItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthItem {
    pub industry_id: String,
    pub years: Vec<i32>,
    pub prediction: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    #[serde(rename = "modelWeights")]
    pub model_weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsResponse {
    pub items: Vec<JobsItem>,
    pub geo: Vec<JobsGeoRow>,
}

/// Employment breakdown for one industry-year.
///
/// `employment_total` is authoritative; it is not guaranteed to equal the sum of the
/// three components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobsItem {
    pub industry_id: String,
    pub year: i32,
    pub employment_direct: u64,
    pub employment_indirect: u64,
    pub employment_induced: u64,
    pub employment_total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobsGeoRow {
    pub state: String,
    pub industry_id: String,
    pub year: i32,
    pub employment_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub items: Vec<SentimentItem>,
    pub correlations: BTreeMap<String, SentimentCorrelation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentItem {
    pub industry_id: String,
    pub period: String,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentCorrelation {
    pub current: f64,
    #[serde(rename = "bestLag", deserialize_with = "integral_lag")]
    pub best_lag: u32,
    #[serde(rename = "corrAtBestLag")]
    pub corr_at_best_lag: f64,
}

// The ML service reports the lag as a float (e.g. `2.0`).
fn integral_lag<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "bestLag must be a non-negative integer (got {v})"
        )));
    }
    Ok(v as u32)
}
