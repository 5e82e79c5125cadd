use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use vnx_data::FetchError;
use vnx_widgets::WidgetError;

/// Everything a widget endpoint can fail with, mapped onto the HTTP
/// surface. Bodies are `{"detail": "..."}`; stack traces stay server-side.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upstream had no current record for the symbol.
    #[error("No data found for symbol: {0}")]
    NotFound(String),

    /// Upstream had no history for the symbol.
    #[error("No historical data found for symbol: {0}")]
    NoHistory(String),

    /// History exists but no record carries a usable date.
    #[error("Insufficient historical data for symbol: {0}")]
    InsufficientData(String),

    /// Transport failure, bad status, or an undecodable (untrusted) payload
    /// from the mandatory fetch.
    #[error("Error fetching {operation} for symbol {symbol}: {source}")]
    Upstream {
        operation: &'static str,
        symbol: String,
        #[source]
        source: FetchError,
    },

    #[error("Error loading app manifest: {0}")]
    Manifest(String),
}

impl ApiError {
    /// Wrap a failed mandatory fetch, logging symbol and operation.
    pub fn upstream(operation: &'static str, symbol: &str, source: FetchError) -> Self {
        log::error!("{operation} fetch failed for {symbol}: {source}");
        Self::Upstream {
            operation,
            symbol: symbol.to_string(),
            source,
        }
    }
}

// WidgetError only arises on the chart path, so its NotFound carries the
// historical wording.
impl From<WidgetError> for ApiError {
    fn from(err: WidgetError) -> Self {
        match err {
            WidgetError::NotFound(symbol) => ApiError::NoHistory(symbol),
            WidgetError::InsufficientData(symbol) => ApiError::InsufficientData(symbol),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::NoHistory(_) | ApiError::InsufficientData(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Upstream { .. } | ApiError::Manifest(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
