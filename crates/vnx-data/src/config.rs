use anyhow::Context;
use dotenv::var;

pub const DEFAULT_BASE_URL: &str = "https://api.blueskyapi.com/v1";

/// Upstream API configuration, read from the environment (`.env` aware).
///
/// Loaded once at startup and shared read-only thereafter.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub api_key: String,
}

impl Settings {
    /// Read `VIANEXUS_BASE_URL` and `VIANEXUS_API_KEY`.
    ///
    /// The base URL falls back to [`DEFAULT_BASE_URL`]; the API key has no
    /// usable default, so a missing key fails startup.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            base_url: var("VIANEXUS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: var("VIANEXUS_API_KEY").context("VIANEXUS_API_KEY must be set")?,
        })
    }
}
