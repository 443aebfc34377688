pub mod delegate;
pub mod domain;
pub mod forecast;
pub mod upstream;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub ml_url: Option<String>,
        pub ml_timeout_secs: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                ml_url: std::env::var("ML_URL").ok().filter(|s| !s.trim().is_empty()),
                ml_timeout_secs: parse_timeout_secs(std::env::var("ML_TIMEOUT_SECS").ok()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_ml_url(&self) -> anyhow::Result<&str> {
            self.ml_url.as_deref().context("ML_URL is required")
        }
    }

    // A zero timeout would fail every upstream call, so it counts as unset.
    fn parse_timeout_secs(raw: Option<String>) -> Option<u64> {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
    }

}
