pub mod config;
pub mod dataset;
pub mod schemas;

pub use config::Settings;
pub use dataset::{Dataset, FetchError};
pub use schemas::{StockStats, VnxQuote};
