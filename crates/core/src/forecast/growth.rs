use crate::domain::forecast::{GrowthItem, GrowthResponse};
use crate::domain::request::GrowthRequest;
use crate::forecast::{resolve_industries, to_strings, BASE_YEAR};
use std::collections::BTreeMap;

/// Constants for the compound-growth projection.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthProfile {
    pub base_year: i32,
    pub default_industries: Vec<String>,
    pub default_horizon_years: u32,
    pub base_value: f64,
    pub base_value_step: f64,
    pub rate: f64,
    pub rate_step: f64,
    /// Half-width of the confidence band as a fraction of the prediction.
    pub band: f64,
    pub model_weights: BTreeMap<String, f64>,
}

impl Default for GrowthProfile {
    fn default() -> Self {
        Self {
            base_year: BASE_YEAR,
            default_industries: to_strings(&["manufacturing", "space_vehicles"]),
            default_horizon_years: 5,
            base_value: 20_000.0,
            base_value_step: 5_000.0,
            rate: 0.08,
            rate_step: 0.02,
            band: 0.15,
            model_weights: BTreeMap::from([
                ("prophet".to_string(), 0.4),
                ("rf".to_string(), 0.35),
                ("arima".to_string(), 0.25),
            ]),
        }
    }
}

pub fn generate(req: &GrowthRequest, profile: &GrowthProfile) -> GrowthResponse {
    let industries = resolve_industries(&req.industry_ids, &profile.default_industries);
    let horizon = req.horizon_years.unwrap_or(profile.default_horizon_years);

    let items: Vec<GrowthItem> = industries
        .into_iter()
        .enumerate()
        .map(|(k, industry_id)| project(industry_id, k, horizon, profile))
        .collect();

    tracing::debug!(items = items.len(), horizon, "generated fallback growth");
    GrowthResponse { items }
}

fn project(industry_id: String, k: usize, horizon: u32, profile: &GrowthProfile) -> GrowthItem {
    let k = k as f64;
    let base = profile.base_value + profile.base_value_step * k;
    let growth = 1.0 + profile.rate + profile.rate_step * k;

    let years: Vec<i32> = (1..=horizon as i32).map(|y| profile.base_year + y).collect();
    let prediction: Vec<f64> = (1..=horizon as i32).map(|y| base * growth.powi(y)).collect();
    let lower = prediction.iter().map(|v| v * (1.0 - profile.band)).collect();
    let upper = prediction.iter().map(|v| v * (1.0 + profile.band)).collect();

    GrowthItem {
        industry_id,
        years,
        prediction,
        lower,
        upper,
        model_weights: profile.model_weights.clone(),
    }
}
