use crate::domain::forecast::{SentimentCorrelation, SentimentItem, SentimentResponse};
use crate::domain::request::{SentimentRequest, Window};
use crate::forecast::{resolve_industries, to_strings, BASE_YEAR};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentProfile {
    /// The window ends with the last period of this year.
    pub base_year: i32,
    pub default_industries: Vec<String>,
    pub default_lag_max: u32,
    pub periods: u32,
    pub amplitude: f64,
    pub offset_step: f64,
    pub current_corr: f64,
    pub best_lag_corr: f64,
    pub corr_step: f64,
    pub best_lag: u32,
}

impl Default for SentimentProfile {
    fn default() -> Self {
        Self {
            base_year: BASE_YEAR,
            default_industries: to_strings(&[
                "manufacturing",
                "space_vehicles",
                "information",
                "professional_rd",
            ]),
            default_lag_max: 8,
            periods: 8,
            amplitude: 0.1,
            offset_step: 0.1,
            current_corr: 0.2,
            best_lag_corr: 0.3,
            corr_step: 0.1,
            best_lag: 2,
        }
    }
}

pub fn generate(req: &SentimentRequest, profile: &SentimentProfile) -> SentimentResponse {
    let industries = resolve_industries(&req.industry_ids, &profile.default_industries);
    let lag_max = req.lag_max.unwrap_or(profile.default_lag_max);
    let periods = period_labels(req.window, profile);

    let mut items = Vec::with_capacity(industries.len() * periods.len());
    let mut correlations = BTreeMap::new();
    for (k, industry_id) in industries.iter().enumerate() {
        let offset = profile.offset_step * k as f64;
        for (i, period) in periods.iter().enumerate() {
            items.push(SentimentItem {
                industry_id: industry_id.clone(),
                period: period.clone(),
                sentiment: saturate(offset + profile.amplitude * (i as f64).sin()),
            });
        }

        // Placeholders; deliberately not derived from the series above.
        let step = profile.corr_step * k as f64;
        correlations.insert(
            industry_id.clone(),
            SentimentCorrelation {
                current: saturate(profile.current_corr + step),
                best_lag: profile.best_lag.min(lag_max),
                corr_at_best_lag: saturate(profile.best_lag_corr + step),
            },
        );
    }

    tracing::debug!(
        items = items.len(),
        window = ?req.window,
        lag_max,
        "generated fallback sentiment"
    );
    SentimentResponse {
        items,
        correlations,
    }
}

fn saturate(v: f64) -> f64 {
    v.clamp(-1.0, 1.0)
}

/// Labels for the `profile.periods` periods ending with the base year, e.g. `2022Q1`..`2023Q4`
/// or `2023-05`..`2023-12`.
pub fn period_labels(window: Window, profile: &SentimentProfile) -> Vec<String> {
    let months_per_period = match window {
        Window::Quarterly => 3,
        Window::Monthly => 1,
    };
    let span = profile.periods * months_per_period;
    let Some(start) = NaiveDate::from_ymd_opt(profile.base_year + 1, 1, 1)
        .and_then(|end| end.checked_sub_months(Months::new(span)))
    else {
        return Vec::new();
    };

    (0..profile.periods)
        .filter_map(|i| start.checked_add_months(Months::new(i * months_per_period)))
        .map(|d| match window {
            Window::Quarterly => format!("{}Q{}", d.year(), d.month0() / 3 + 1),
            Window::Monthly => d.format("%Y-%m").to_string(),
        })
        .collect()
}
