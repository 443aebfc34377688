use crate::domain::forecast::{JobsGeoRow, JobsItem, JobsResponse};
use crate::domain::request::JobsRequest;
use crate::forecast::{resolve_industries, to_strings, BASE_YEAR};

/// State and territory codes plotted on the dashboard map, in allocation order.
pub const STATE_CODES: [&str; 48] = [
    "CA", "TX", "FL", "CO", "WA", "VA", "AL", "AZ", "OH", "NM", "NY", "MD", "MA", "NC", "GA", "PA",
    "IL", "MI", "UT", "TN", "OR", "OK", "WI", "MN", "IN", "NJ", "CT", "NH", "ME", "RI", "DE", "KY",
    "AR", "MS", "IA", "KS", "NE", "ND", "SD", "ID", "MT", "WY", "WV", "LA", "SC", "MO", "NV", "DC",
];

/// A linear `intercept + slope * year_offset` employment term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear {
    pub intercept: u64,
    pub slope: u64,
}

impl Linear {
    pub const fn new(intercept: u64, slope: u64) -> Self {
        Self { intercept, slope }
    }

    fn at(&self, offset: u64) -> u64 {
        self.intercept + self.slope * offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobsProfile {
    pub base_year: i32,
    pub default_industries: Vec<String>,
    pub default_horizon_years: u32,
    pub direct: Linear,
    pub indirect: Linear,
    pub induced: Linear,
    /// Defined on its own, not as the sum of the components.
    pub total: Linear,
    pub states: Vec<String>,
    /// Extra share added per step of `state_idx % share_cycle`.
    pub share_step: f64,
    pub share_cycle: usize,
    pub min_state_employment: u64,
}

impl Default for JobsProfile {
    fn default() -> Self {
        Self {
            base_year: BASE_YEAR,
            default_industries: to_strings(&["manufacturing"]),
            default_horizon_years: 5,
            direct: Linear::new(10_000, 500),
            indirect: Linear::new(4_000, 200),
            induced: Linear::new(3_000, 150),
            total: Linear::new(17_000, 850),
            states: to_strings(&STATE_CODES),
            share_step: 0.005,
            share_cycle: 5,
            min_state_employment: 1,
        }
    }
}

impl JobsProfile {
    /// Fraction of an industry-year total allocated to the state at `idx`.
    pub fn state_share(&self, idx: usize) -> f64 {
        let n = self.states.len().max(1) as f64;
        let cycle = self.share_cycle.max(1);
        1.0 / n + (idx % cycle) as f64 * self.share_step
    }
}

pub fn generate(req: &JobsRequest, profile: &JobsProfile) -> JobsResponse {
    let industries = resolve_industries(&req.industry_ids, &profile.default_industries);
    let horizon = req.horizon_years.unwrap_or(profile.default_horizon_years);

    let items: Vec<JobsItem> = industries
        .iter()
        .flat_map(|id| (0..horizon).map(move |i| breakdown(id, i, profile)))
        .collect();

    let geo: Vec<JobsGeoRow> = items.iter().flat_map(|row| allocate(row, profile)).collect();

    tracing::debug!(
        items = items.len(),
        geo = geo.len(),
        horizon,
        "generated fallback jobs"
    );
    JobsResponse { items, geo }
}

fn breakdown(industry_id: &str, offset: u32, profile: &JobsProfile) -> JobsItem {
    let i = u64::from(offset);
    JobsItem {
        industry_id: industry_id.to_string(),
        year: profile.base_year + 1 + offset as i32,
        employment_direct: profile.direct.at(i),
        employment_indirect: profile.indirect.at(i),
        employment_induced: profile.induced.at(i),
        employment_total: profile.total.at(i),
    }
}

// Each state is floored independently, so the rows need not add up to the item total.
fn allocate<'a>(
    row: &'a JobsItem,
    profile: &'a JobsProfile,
) -> impl Iterator<Item = JobsGeoRow> + 'a {
    let total = row.employment_total as f64;
    profile.states.iter().enumerate().map(move |(idx, state)| {
        let share = (total * profile.state_share(idx)).floor() as u64;
        JobsGeoRow {
            state: state.clone(),
            industry_id: row.industry_id.clone(),
            year: row.year,
            employment_total: share.max(profile.min_state_employment),
        }
    })
}
