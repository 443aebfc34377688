use crate::config::Settings;
use crate::upstream::{Capability, ForecastUpstream, UpstreamError};
use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the ML forecasting service. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpForecastService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpForecastService {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_ml_url()?;
        let timeout_secs = settings.ml_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(base_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.trim();
        anyhow::ensure!(!base_url.is_empty(), "ML service base URL must be non-empty");

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build ML service http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, capability: Capability) -> String {
        format!("{}{}", self.base_url, capability.path())
    }
}

#[async_trait::async_trait]
impl ForecastUpstream for HttpForecastService {
    fn name(&self) -> &'static str {
        "ml_service_http"
    }

    async fn forward(&self, capability: Capability, body: &Value) -> anyhow::Result<Value> {
        let res = self
            .http
            .post(self.url(capability))
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(capability, e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| UpstreamError::transport(capability, e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::http(capability, format!("status={status}")).into());
        }

        let json = serde_json::from_str::<Value>(&text).map_err(|e| {
            UpstreamError::decode(capability, format!("response is not valid JSON: {e}"))
        })?;
        Ok(json)
    }
}
