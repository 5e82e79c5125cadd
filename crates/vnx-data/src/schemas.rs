use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
// Two record shapes are in use. Every display-relevant field is optional:
// the feed omits what it does not have, and an absent field produces no
// metric downstream. A present-but-mistyped field fails decoding outright.
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One `CORE/STOCK_STATS_US` record.
///
/// ```json
/// {
///     "52weekChange": -0.19,
///     "52weekHigh": 312.56,
///     "52weekHighDate": "2025-01-30",
///     "52weekLow": 201.68,
///     "52weekLowDate": "2025-04-07",
///     "avg30DayVolume": 180729,
///     "beta": 0.87,
///     "date": "2025-11-21",
///     "day200MovingAverage": 240.85,
///     "day50MovingAverage": 237.55,
///     "epsTtm": 28.52,
///     "issuerName": "Asbury Automotive Group Inc",
///     "mic": "XNYS",
///     "peRatioTtm": 7.69,
///     "sharesOutstanding": 19440558,
///     "symbol": "ABG",
///     "ytdChange": -0.11,
///     "updated": 1763730632006.439
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct StockStats {
    #[serde(rename = "52weekChange")]
    pub week_52_change: Option<f64>,
    #[serde(rename = "52weekHigh")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52weekHighDate")]
    pub week_52_high_date: Option<String>,
    #[serde(rename = "52weekLow")]
    pub week_52_low: Option<f64>,
    #[serde(rename = "52weekLowDate")]
    pub week_52_low_date: Option<String>,
    #[serde(rename = "avg30DayVolume")]
    pub avg_30_day_volume: Option<u64>,
    pub beta: Option<f64>,
    pub date: Option<String>,
    #[serde(rename = "day200MovingAverage")]
    pub day_200_moving_average: Option<f64>,
    #[serde(rename = "day50MovingAverage")]
    pub day_50_moving_average: Option<f64>,
    #[serde(rename = "epsTtm")]
    pub eps_ttm: Option<f64>,
    #[serde(rename = "issuerName")]
    pub issuer_name: Option<String>,
    pub mic: Option<String>,
    #[serde(rename = "peRatioTtm")]
    pub pe_ratio_ttm: Option<f64>,
    #[serde(rename = "sharesOutstanding")]
    pub shares_outstanding: Option<u64>,
    pub symbol: Option<String>,
    #[serde(rename = "ytdChange")]
    pub ytd_change: Option<f64>,
    /// Epoch milliseconds; the feed sends a fractional part.
    pub updated: Option<f64>,
}

/// One `EDGE/VNX_QUOTE` record.
///
/// A price or size of `0` means "not applicable" upstream, not a real
/// price; the formatter suppresses those metrics.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct VnxQuote {
    #[serde(rename = "vnxSymbol")]
    pub symbol: Option<String>,
    #[serde(rename = "vnxBidSize")]
    pub bid_size: Option<u64>,
    #[serde(rename = "vnxBidPrice")]
    pub bid_price: Option<f64>,
    #[serde(rename = "vnxAskSize")]
    pub ask_size: Option<u64>,
    #[serde(rename = "vnxAskPrice")]
    pub ask_price: Option<f64>,
    #[serde(rename = "vnxPrice")]
    pub price: Option<f64>,
    #[serde(rename = "vnxLastSalePrice")]
    pub last_sale_price: Option<f64>,
    #[serde(rename = "vnxLastSaleSize")]
    pub last_sale_size: Option<u64>,
    #[serde(rename = "vnxLowPrice")]
    pub low_price: Option<f64>,
    #[serde(rename = "vnxHighPrice")]
    pub high_price: Option<f64>,
    #[serde(rename = "vnxOpenPrice")]
    pub open_price: Option<f64>,
    #[serde(rename = "vnxClosePrice")]
    pub close_price: Option<f64>,
    #[serde(rename = "vnxVolume")]
    pub volume: Option<u64>,
    #[serde(rename = "vnxTimestamp")]
    pub timestamp: Option<i64>,
    #[serde(rename = "vnxMarketPercent")]
    pub market_percent: Option<f64>,
    #[serde(rename = "vnxHighTime")]
    pub high_time: Option<i64>,
    #[serde(rename = "vnxLowTime")]
    pub low_time: Option<i64>,
    #[serde(rename = "vnxPriceType")]
    pub price_type: Option<String>,
    #[serde(rename = "MarketVolume")]
    pub market_volume: Option<u64>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
