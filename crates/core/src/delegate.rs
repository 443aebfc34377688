//! Upstream-first delegation with a local fallback.
//!
//! A request is forwarded once to the ML service. Any failure (transport, non-2xx status, body
//! that is not JSON or does not match the capability's schema) switches to the matching local
//! generator, fed with the same original body. Responses are never merged.

use crate::domain::forecast::{GrowthResponse, JobsResponse, SentimentResponse};
use crate::domain::request::ForecastBody;
use crate::forecast::{growth, jobs, sentiment, FallbackProfile};
use crate::upstream::{Capability, ForecastUpstream, UpstreamError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Upstream,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Fallback => "fallback",
        }
    }
}

/// Outcome of a delegated request: the upstream JSON verbatim, or a locally generated payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Delegated<T> {
    Upstream { payload: Value },
    Fallback { payload: T, reason: String },
}

impl<T: Serialize> Delegated<T> {
    pub fn source(&self) -> Source {
        match self {
            Self::Upstream { .. } => Source::Upstream,
            Self::Fallback { .. } => Source::Fallback,
        }
    }

    pub fn into_json(self) -> anyhow::Result<Value> {
        match self {
            Self::Upstream { payload } => Ok(payload),
            Self::Fallback { payload, .. } => Ok(serde_json::to_value(payload)?),
        }
    }
}

#[derive(Clone)]
pub struct Delegator {
    upstream: Option<Arc<dyn ForecastUpstream>>,
    profile: Arc<FallbackProfile>,
}

impl Delegator {
    pub fn new(upstream: Arc<dyn ForecastUpstream>, profile: FallbackProfile) -> Self {
        Self {
            upstream: Some(upstream),
            profile: Arc::new(profile),
        }
    }

    /// Every request is answered by the local generators.
    pub fn fallback_only(profile: FallbackProfile) -> Self {
        Self {
            upstream: None,
            profile: Arc::new(profile),
        }
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    pub async fn growth(&self, body: &ForecastBody) -> Delegated<GrowthResponse> {
        self.delegate(Capability::Growth, body, || {
            growth::generate(&body.growth(), &self.profile.growth)
        })
        .await
    }

    pub async fn jobs(&self, body: &ForecastBody) -> Delegated<JobsResponse> {
        self.delegate(Capability::Jobs, body, || {
            jobs::generate(&body.jobs(), &self.profile.jobs)
        })
        .await
    }

    pub async fn sentiment(&self, body: &ForecastBody) -> Delegated<SentimentResponse> {
        self.delegate(Capability::Sentiment, body, || {
            sentiment::generate(&body.sentiment(), &self.profile.sentiment)
        })
        .await
    }

    async fn delegate<T, F>(
        &self,
        capability: Capability,
        body: &ForecastBody,
        fallback: F,
    ) -> Delegated<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let reason = match &self.upstream {
            None => {
                tracing::debug!(%capability, "no upstream configured; serving fallback");
                "no upstream configured".to_string()
            }
            Some(upstream) => match fetch_checked::<T>(upstream.as_ref(), capability, body).await {
                Ok(payload) => {
                    tracing::debug!(%capability, upstream = upstream.name(), "served from upstream");
                    return Delegated::Upstream { payload };
                }
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::warn!(
                        %capability,
                        upstream = upstream.name(),
                        error = %reason,
                        "upstream failed; serving fallback"
                    );
                    reason
                }
            },
        };

        Delegated::Fallback {
            payload: fallback(),
            reason,
        }
    }
}

async fn fetch_checked<T: DeserializeOwned>(
    upstream: &dyn ForecastUpstream,
    capability: Capability,
    body: &ForecastBody,
) -> anyhow::Result<Value> {
    let payload = upstream.forward(capability, body.raw()).await?;
    if let Err(e) = T::deserialize(&payload) {
        return Err(UpstreamError::decode(
            capability,
            format!("response does not match the {capability} schema: {e}"),
        )
        .into());
    }
    Ok(payload)
}
