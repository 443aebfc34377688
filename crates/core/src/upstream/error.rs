use crate::upstream::Capability;
use std::fmt;

#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub capability: Capability,
    /// One of `transport`, `http`, `decode`.
    pub stage: &'static str,
    pub detail: String,
}

impl UpstreamError {
    pub fn transport(capability: Capability, detail: impl Into<String>) -> Self {
        Self {
            capability,
            stage: "transport",
            detail: detail.into(),
        }
    }

    pub fn http(capability: Capability, detail: impl Into<String>) -> Self {
        Self {
            capability,
            stage: "http",
            detail: detail.into(),
        }
    }

    pub fn decode(capability: Capability, detail: impl Into<String>) -> Self {
        Self {
            capability,
            stage: "decode",
            detail: detail.into(),
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upstream error (capability={}, stage={}): {}",
            self.capability, self.stage, self.detail
        )
    }
}

impl std::error::Error for UpstreamError {}
