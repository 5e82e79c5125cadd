use crate::config::Settings;
use log::{debug, error};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Upstream requests are cut off after this long; expiry surfaces as a
/// [`FetchError::Request`], never a retry.
const TIMEOUT: Duration = Duration::from_secs(10);

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Vianexus dataset endpoints
//
// Every dataset shares one GET shape:
//
//      {base_url}/data/{namespace}/{dataset}/{symbols}?token={api_key}&last={n}
//
// and returns a JSON array of records, one object per symbol per period.
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One Vianexus dataset endpoint, e.g. `CORE/STOCK_STATS_US`.
#[derive(Debug, Clone)]
pub struct Dataset {
    base_url: String,
    token: String,
    namespace: &'static str,
    dataset: &'static str,
}

impl Dataset {
    fn new(settings: &Settings, namespace: &'static str, dataset: &'static str) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            token: settings.api_key.clone(),
            namespace,
            dataset,
        }
    }

    /// Daily stock statistics: `CORE/STOCK_STATS_US`.
    pub fn stock_stats(settings: &Settings) -> Self {
        Self::new(settings, "CORE", "STOCK_STATS_US")
    }

    /// Real-time quotes: `EDGE/VNX_QUOTE`.
    pub fn vnx_quote(settings: &Settings) -> Self {
        Self::new(settings, "EDGE", "VNX_QUOTE")
    }

    /// `namespace/dataset` label used in logs and errors.
    pub fn path(&self) -> String {
        format!("{}/{}", self.namespace, self.dataset)
    }

    fn url(&self, symbols: &[&str]) -> String {
        format!(
            "{}/data/{}/{}/{}",
            self.base_url,
            self.namespace,
            self.dataset,
            symbols.join(",")
        )
    }

    /// GET the last `last` records per symbol and decode them into `Vec<D>`.
    ///
    /// The token rides as a query parameter; it never appears in the logs
    /// or the error text.
    pub async fn fetch<D>(
        &self,
        client: &reqwest::Client,
        symbols: &[&str],
        last: u32,
    ) -> Result<Vec<D>, FetchError>
    where
        D: DeserializeOwned,
    {
        let url = self.url(symbols);
        let joined = symbols.join(",");

        let response = client
            .get(&url)
            .query(&[("token", self.token.as_str()), ("last", &last.to_string())])
            .timeout(TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                // the request URL carries the token, so it is stripped here
                let e = e.without_url();
                error!("request to {} failed for [{joined}]: {e}", self.path());
                FetchError::Request {
                    dataset: self.path(),
                    symbols: joined.clone(),
                    source: e,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("{} returned HTTP {status} for [{joined}]", self.path());
            return Err(FetchError::Status {
                dataset: self.path(),
                symbols: joined,
                status,
            });
        }

        let records: Vec<D> = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("failed decoding {} response for [{joined}]: {e}", self.path());
            FetchError::Decode {
                dataset: self.path(),
                symbols: joined.clone(),
                source: e,
            }
        })?;

        debug!("{} returned {} record(s) for [{joined}]", self.path(), records.len());
        Ok(records)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Failure taxonomy
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// The feed is untrusted: a record that fails to decode ([`Decode`]) is the
/// same class of failure as a refused connection or a 5xx.
///
/// [`Decode`]: FetchError::Decode
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {dataset} failed for [{symbols}]: {source}")]
    Request {
        dataset: String,
        symbols: String,
        source: reqwest::Error,
    },

    #[error("{dataset} returned HTTP {status} for [{symbols}]")]
    Status {
        dataset: String,
        symbols: String,
        status: reqwest::StatusCode,
    },

    #[error("failed decoding {dataset} response for [{symbols}]: {source}")]
    Decode {
        dataset: String,
        symbols: String,
        source: reqwest::Error,
    },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
