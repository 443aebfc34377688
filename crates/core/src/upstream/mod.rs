pub mod error;
pub mod http;

use serde_json::Value;
use std::fmt;

pub use error::UpstreamError;
pub use http::HttpForecastService;

/// Forecast capability exposed by the ML service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Growth,
    Jobs,
    Sentiment,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Jobs => "jobs",
            Self::Sentiment => "sentiment",
        }
    }

    /// Path of the capability on the ML service.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Growth => "/forecast/growth",
            Self::Jobs => "/jobs",
            Self::Sentiment => "/sentiment",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait::async_trait]
pub trait ForecastUpstream: Send + Sync {
    fn name(&self) -> &'static str;

    /// Forward the request body verbatim and return the JSON the service answered with.
    async fn forward(&self, capability: Capability, body: &Value) -> anyhow::Result<Value>;
}
