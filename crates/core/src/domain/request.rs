use serde_json::Value;

pub const MAX_HORIZON_YEARS: u32 = 50;
pub const MAX_LAG: u32 = 64;

/// Raw proxy request body as the dashboard sent it.
///
/// The body is kept verbatim so it can be forwarded upstream unmodified; the typed views
/// below are derived from it on demand and never fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBody(Value);

impl ForecastBody {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Bodies that are not valid JSON behave like `null`: every field takes its default.
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => Self(v),
            Err(err) => {
                tracing::debug!(error = %err, "request body is not JSON; using defaults");
                Self(Value::Null)
            }
        }
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn growth(&self) -> GrowthRequest {
        GrowthRequest {
            industry_ids: self.industry_ids(),
            horizon_years: self.positive_int("horizon_years", MAX_HORIZON_YEARS),
        }
    }

    pub fn jobs(&self) -> JobsRequest {
        JobsRequest {
            industry_ids: self.industry_ids(),
            horizon_years: self.positive_int("horizon_years", MAX_HORIZON_YEARS),
        }
    }

    pub fn sentiment(&self) -> SentimentRequest {
        let window = self
            .0
            .get("window")
            .and_then(Value::as_str)
            .and_then(Window::parse)
            .unwrap_or_default();

        SentimentRequest {
            industry_ids: self.industry_ids(),
            window,
            lag_max: self.positive_int("lag_max", MAX_LAG),
        }
    }

    // Non-string entries are dropped; an empty result means "use the profile defaults".
    fn industry_ids(&self) -> Vec<String> {
        match self.0.get("industry_ids") {
            Some(Value::Array(ids)) => ids
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn positive_int(&self, key: &str, cap: u32) -> Option<u32> {
        let n = match self.0.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !n.is_finite() || n < 1.0 {
            return None;
        }
        Some(n.trunc().min(f64::from(cap)) as u32)
    }
}

impl From<Value> for ForecastBody {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    #[default]
    Quarterly,
    Monthly,
}

impl Window {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" => Some(Self::Quarterly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthRequest {
    pub industry_ids: Vec<String>,
    pub horizon_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsRequest {
    pub industry_ids: Vec<String>,
    pub horizon_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentRequest {
    pub industry_ids: Vec<String>,
    pub window: Window,
    pub lag_max: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_well_formed_growth_body() {
        let body = ForecastBody::new(json!({
            "industry_ids": ["manufacturing", "space_vehicles"],
            "horizon_years": 3,
        }));
        let req = body.growth();
        assert_eq!(req.industry_ids, vec!["manufacturing", "space_vehicles"]);
        assert_eq!(req.horizon_years, Some(3));
    }

    #[test]
    fn non_array_industry_ids_fall_back_to_empty() {
        let body = ForecastBody::new(json!({"industry_ids": "manufacturing"}));
        assert!(body.growth().industry_ids.is_empty());

        let body = ForecastBody::new(json!({"industry_ids": [1, null, {"a": 1}]}));
        assert!(body.jobs().industry_ids.is_empty());
    }

    #[test]
    fn keeps_order_and_duplicates_and_drops_non_strings() {
        let body = ForecastBody::new(json!({"industry_ids": ["b", 7, "a", "b"]}));
        assert_eq!(body.jobs().industry_ids, vec!["b", "a", "b"]);
    }

    #[test]
    fn horizon_accepts_numeric_strings_and_truncates() {
        let body = ForecastBody::new(json!({"horizon_years": "4"}));
        assert_eq!(body.growth().horizon_years, Some(4));

        let body = ForecastBody::new(json!({"horizon_years": 3.9}));
        assert_eq!(body.growth().horizon_years, Some(3));
    }

    #[test]
    fn horizon_rejects_non_positive_and_garbage() {
        for v in [json!(0), json!(-2), json!("abc"), json!(null), json!(true), json!(0.5)] {
            let body = ForecastBody::new(json!({"horizon_years": v}));
            assert_eq!(body.growth().horizon_years, None, "value {v}");
        }
    }

    #[test]
    fn horizon_is_capped() {
        let body = ForecastBody::new(json!({"horizon_years": 100000}));
        assert_eq!(body.jobs().horizon_years, Some(MAX_HORIZON_YEARS));
    }

    #[test]
    fn sentiment_window_and_lag() {
        let body = ForecastBody::new(json!({"window": "Monthly", "lag_max": 3}));
        let req = body.sentiment();
        assert_eq!(req.window, Window::Monthly);
        assert_eq!(req.lag_max, Some(3));

        let body = ForecastBody::new(json!({"window": "weekly", "lag_max": "x"}));
        let req = body.sentiment();
        assert_eq!(req.window, Window::Quarterly);
        assert_eq!(req.lag_max, None);
    }

    #[test]
    fn invalid_json_behaves_like_null() {
        let body = ForecastBody::from_slice(b"{not json");
        assert_eq!(body.raw(), &Value::Null);
        assert!(body.sentiment().industry_ids.is_empty());

        let body = ForecastBody::from_slice(b"[1,2,3]");
        assert_eq!(body.growth().horizon_years, None);
    }
}
