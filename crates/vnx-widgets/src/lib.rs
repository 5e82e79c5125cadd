pub mod chart;
pub mod metrics;
pub mod registry;

pub use chart::{build_chart, ChartFigure};
pub use metrics::{format_stock_stats, Metric, MetricsDisplay};
pub use registry::{WidgetConfig, WidgetRegistry};

/// User-visible "no data" conditions raised below the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Upstream returned zero records for the requested symbol.
    #[error("no data found for symbol: {0}")]
    NotFound(String),

    /// Records exist, but none carries a usable date field.
    #[error("insufficient historical data for symbol: {0}")]
    InsufficientData(String),
}
