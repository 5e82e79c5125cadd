use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vnx_data::{StockStats, VnxQuote};

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Metric output
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One display metric; the order of emission is the display order.
///
/// ```json
/// {
///     "label": "52-Week Change",
///     "value": "-19.00%",
///     "delta": "-0.1900"
/// }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct Metric {
    pub label: String,
    /// Pre-formatted display string.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unformatted fraction, rendered to four decimals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            description: None,
            delta: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn delta(mut self, fraction: f64) -> Self {
        self.delta = Some(format!("{fraction:.4}"));
        self
    }
}

/// Which metric sections `/stock_stats` returns. Company and freshness ride
/// every filter; everything else belongs to exactly one section.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricsDisplay {
    #[default]
    All,
    PricePerformance,
    Fundamentals,
    Technical,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    PricePerformance,
    Fundamentals,
    Technical,
}

impl MetricsDisplay {
    fn shows(self, section: Section) -> bool {
        match self {
            MetricsDisplay::All => true,
            MetricsDisplay::PricePerformance => section == Section::PricePerformance,
            MetricsDisplay::Fundamentals => section == Section::Fundamentals,
            MetricsDisplay::Technical => section == Section::Technical,
        }
    }
}

lazy_static! {
    /// MIC -> venue name; unknown codes pass through verbatim.
    static ref MIC_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("XNYS", "New York Stock Exchange"),
        ("XNAS", "Nasdaq Stock Market"),
        ("XASE", "NYSE American"),
        ("ARCX", "NYSE Arca"),
        ("BATS", "Cboe BZX Exchange"),
        ("IEXG", "Investors Exchange"),
        ("XLON", "London Stock Exchange"),
        ("XTSE", "Toronto Stock Exchange"),
    ]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Formatting pipeline
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Shape one daily-statistics record (plus the latest real-time quote, when
/// one was available) into the ordered metric list for the dashboard.
///
/// Every metric is conditional on its input fields being present; an absent
/// field emits nothing, never a placeholder. The quote is genuinely
/// optional: with `None`, output degrades to the daily record alone.
/// `now` is injected so freshness bucketing stays deterministic.
pub fn format_stock_stats(
    stats: &StockStats,
    quote: Option<&VnxQuote>,
    display: MetricsDisplay,
    now: DateTime<Utc>,
) -> Vec<Metric> {
    let mut metrics = Vec::new();

    // identity rides every filter
    if let Some(name) = &stats.issuer_name {
        let value = match &stats.symbol {
            Some(symbol) => format!("{name} ({symbol})"),
            None => name.clone(),
        };
        metrics.push(Metric::new("Company", value));
    }

    if display.shows(Section::PricePerformance) {
        if let Some(high) = stats.week_52_high {
            metrics.push(Metric::new("52-Week High", format!("${high:.2}")).describe(format!(
                "Date: {}",
                stats.week_52_high_date.as_deref().unwrap_or("N/A")
            )));
        }

        if let Some(low) = stats.week_52_low {
            metrics.push(Metric::new("52-Week Low", format!("${low:.2}")).describe(format!(
                "Date: {}",
                stats.week_52_low_date.as_deref().unwrap_or("N/A")
            )));
        }

        if let Some(change) = stats.week_52_change {
            metrics.push(
                Metric::new("52-Week Change", format!("{:+.2}%", change * 100.0)).delta(change),
            );
        }

        if let Some(change) = stats.ytd_change {
            metrics
                .push(Metric::new("YTD Change", format!("{:+.2}%", change * 100.0)).delta(change));
        }

        if let Some(q) = quote {
            // a zero bound means "not applicable" upstream, not a real price
            if let (Some(low), Some(high)) = (q.low_price, q.high_price) {
                if low > 0.0 && high > 0.0 {
                    metrics.push(Metric::new("Day's Range", format!("${low:.2} - ${high:.2}")));
                }
            }

            if let (Some(price), Some(size)) = (q.bid_price, q.bid_size) {
                if price > 0.0 && size > 0 {
                    metrics.push(Metric::new("Bid", format!("${price:.2} x {size}")));
                }
            }

            if let (Some(price), Some(size)) = (q.ask_price, q.ask_size) {
                if price > 0.0 && size > 0 {
                    metrics.push(Metric::new("Ask", format!("${price:.2} x {size}")));
                }
            }

            if let Some(price) = q.last_sale_price {
                if price > 0.0 {
                    let mut metric = Metric::new("Last Sale", format!("${price:.2}"));
                    if let Some(size) = q.last_sale_size {
                        if size > 0 {
                            metric = metric.describe(format!("Size: {size}"));
                        }
                    }
                    metrics.push(metric);
                }
            }
        }
    }

    if display.shows(Section::Fundamentals) {
        if let Some(pe) = stats.pe_ratio_ttm {
            metrics.push(Metric::new("P/E Ratio (TTM)", format!("{pe:.2}")));
        }

        if let Some(eps) = stats.eps_ttm {
            metrics.push(Metric::new("EPS (TTM)", format!("${eps:.2}")));
        }

        // never computed from a stale record: a live quote price is required
        if let (Some(price), Some(shares)) = (live_price(quote), stats.shares_outstanding) {
            metrics.push(Metric::new(
                "Market Cap",
                scale_currency(price * shares as f64),
            ));
        }

        if let Some(shares) = stats.shares_outstanding {
            metrics.push(Metric::new("Shares Outstanding", scale_count(shares)));
        }

        if let Some(mic) = &stats.mic {
            let venue = MIC_NAMES.get(mic.as_str()).copied().unwrap_or(mic.as_str());
            metrics.push(Metric::new("Exchange", venue).describe(format!("MIC: {mic}")));
        }
    }

    if display.shows(Section::Technical) {
        if let Some(beta) = stats.beta {
            metrics.push(
                Metric::new("Beta", format!("{beta:.2}")).describe("Volatility measure vs. market"),
            );
        }

        if let Some(ma) = stats.day_50_moving_average {
            metrics.push(Metric::new("50-Day MA", format!("${ma:.2}")));
        }

        if let Some(ma) = stats.day_200_moving_average {
            metrics.push(Metric::new("200-Day MA", format!("${ma:.2}")));
        }

        // volume comparison degrades stepwise as inputs go missing
        let today = quote.and_then(|q| q.volume);
        match (today, stats.avg_30_day_volume) {
            (Some(today), Some(avg)) if avg > 0 => {
                metrics.push(
                    Metric::new(
                        "Volume / 30-Day Avg",
                        format!("{} / {}", scale_count(today), scale_count(avg)),
                    )
                    .delta(today as f64 / avg as f64 - 1.0),
                );
            }
            (_, Some(avg)) => {
                metrics.push(Metric::new("Avg 30-Day Volume", scale_count(avg)));
            }
            _ => {}
        }
    }

    // freshness rides every filter
    if let Some(updated) = stats.updated {
        metrics.push(
            Metric::new("Last Updated", freshness(updated, now))
                .describe(format!("Updated: {}", render_timestamp(updated))),
        );
    }

    metrics
}

/// The quote's real-time price, falling back to the last sale. Zero is the
/// feed's "not applicable", so it never counts as live.
fn live_price(quote: Option<&VnxQuote>) -> Option<f64> {
    let q = quote?;
    q.price
        .filter(|p| *p > 0.0)
        .or_else(|| q.last_sale_price.filter(|p| *p > 0.0))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Display scaling
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Scale a count into the K/M/B display tiers; below a thousand, a literal
/// integer with group separators.
fn scale_count(v: u64) -> String {
    if v >= 1_000_000_000 {
        format!("{:.2}B", v as f64 / 1e9)
    } else if v >= 1_000_000 {
        format!("{:.2}M", v as f64 / 1e6)
    } else if v >= 1_000 {
        format!("{:.2}K", v as f64 / 1e3)
    } else {
        with_separators(v)
    }
}

/// Currency scaling for market cap: same tiers plus `T` at a trillion.
fn scale_currency(v: f64) -> String {
    if v >= 1e12 {
        format!("${:.2}T", v / 1e12)
    } else if v >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("${:.2}M", v / 1e6)
    } else if v >= 1e3 {
        format!("${:.2}K", v / 1e3)
    } else {
        format!("${v:.2}")
    }
}

fn with_separators(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Freshness
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Bucket the age of an epoch-millisecond `updated` stamp against `now`.
fn freshness(updated_ms: f64, now: DateTime<Utc>) -> String {
    let elapsed = ((now.timestamp_millis() as f64 - updated_ms) / 1000.0).max(0.0) as i64;

    if elapsed < 60 {
        "Just now".to_string()
    } else if elapsed < 3_600 {
        format!("{} min ago", elapsed / 60)
    } else if elapsed < 86_400 {
        let hrs = elapsed / 3_600;
        if hrs == 1 {
            "1 hr ago".to_string()
        } else {
            format!("{hrs} hrs ago")
        }
    } else {
        let days = elapsed / 86_400;
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    }
}

/// The full timestamp, kept alongside the bucketed value.
fn render_timestamp(updated_ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(updated_ms as i64)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| updated_ms.to_string())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 21, 12, 0, 0).unwrap()
    }

    fn ms_before(now: DateTime<Utc>, secs: i64) -> f64 {
        (now.timestamp_millis() - secs * 1_000) as f64
    }

    fn full_stats() -> StockStats {
        serde_json::from_str(
            r#"{
                "52weekChange": -0.19,
                "52weekHigh": 312.56,
                "52weekHighDate": "2025-01-30",
                "52weekLow": 201.68,
                "52weekLowDate": "2025-04-07",
                "avg30DayVolume": 500000,
                "beta": 0.87,
                "date": "2025-11-21",
                "day200MovingAverage": 240.85,
                "day50MovingAverage": 237.55,
                "epsTtm": 28.52,
                "issuerName": "Asbury Automotive Group Inc",
                "mic": "XNYS",
                "peRatioTtm": 7.69,
                "sharesOutstanding": 19440558,
                "symbol": "ABG",
                "ytdChange": -0.11
            }"#,
        )
        .unwrap()
    }

    fn full_quote() -> VnxQuote {
        serde_json::from_str(
            r#"{
                "vnxSymbol": "ABG",
                "vnxBidSize": 200,
                "vnxBidPrice": 189.50,
                "vnxAskSize": 300,
                "vnxAskPrice": 189.60,
                "vnxPrice": 189.55,
                "vnxLastSalePrice": 189.54,
                "vnxLastSaleSize": 100,
                "vnxLowPrice": 187.20,
                "vnxHighPrice": 190.10,
                "vnxVolume": 600000
            }"#,
        )
        .unwrap()
    }

    fn labels(metrics: &[Metric]) -> Vec<&str> {
        metrics.iter().map(|m| m.label.as_str()).collect()
    }

    fn find<'a>(metrics: &'a [Metric], label: &str) -> Option<&'a Metric> {
        metrics.iter().find(|m| m.label == label)
    }

    // ------------------------------------------------------------------------------------------
    // scaling

    #[test]
    fn count_scaling_tier_boundaries() {
        assert_eq!(scale_count(999), "999");
        assert_eq!(scale_count(1_000), "1.00K");
        assert_eq!(scale_count(999_999), "1000.00K");
        assert_eq!(scale_count(1_000_000), "1.00M");
        assert_eq!(scale_count(999_999_999), "1000.00M");
        assert_eq!(scale_count(1_000_000_000), "1.00B");
        assert_eq!(scale_count(500_000), "500.00K");
    }

    #[test]
    fn small_counts_keep_group_separators() {
        assert_eq!(with_separators(0), "0");
        assert_eq!(with_separators(999), "999");
        assert_eq!(with_separators(1_234_567), "1,234,567");
    }

    #[test]
    fn currency_scaling_has_a_trillion_tier() {
        assert_eq!(scale_currency(3_050_000_000_000.0), "$3.05T");
        assert_eq!(scale_currency(2_500_000_000.0), "$2.50B");
        assert_eq!(scale_currency(7_200_000.0), "$7.20M");
        assert_eq!(scale_currency(1_500.0), "$1.50K");
        assert_eq!(scale_currency(999.0), "$999.00");
    }

    // ------------------------------------------------------------------------------------------
    // freshness

    #[test]
    fn freshness_buckets() {
        let now = now();
        assert_eq!(freshness(ms_before(now, 30), now), "Just now");
        assert_eq!(freshness(ms_before(now, 90), now), "1 min ago");
        assert_eq!(freshness(ms_before(now, 3_700), now), "1 hr ago");
        assert_eq!(freshness(ms_before(now, 7_300), now), "2 hrs ago");
        assert_eq!(freshness(ms_before(now, 90_000), now), "1 day ago");
        assert_eq!(freshness(ms_before(now, 200_000), now), "2 days ago");
    }

    #[test]
    fn freshness_keeps_the_full_timestamp_in_the_description() {
        let mut stats = StockStats::default();
        stats.updated = Some(1763730632006.439);

        let metrics = format_stock_stats(&stats, None, MetricsDisplay::All, now());
        let updated = find(&metrics, "Last Updated").unwrap();
        assert_eq!(
            updated.description.as_deref(),
            Some("Updated: 2025-11-21 13:10:32 UTC")
        );
    }

    // ------------------------------------------------------------------------------------------
    // conditional presence

    #[test]
    fn empty_record_emits_no_metrics() {
        let metrics =
            format_stock_stats(&StockStats::default(), None, MetricsDisplay::All, now());
        assert!(metrics.is_empty());
    }

    #[test]
    fn market_cap_requires_a_live_price_and_shares() {
        let stats = full_stats();
        let quote = full_quote();

        // both present
        let metrics = format_stock_stats(&stats, Some(&quote), MetricsDisplay::All, now());
        assert!(find(&metrics, "Market Cap").is_some());

        // no quote at all
        let metrics = format_stock_stats(&stats, None, MetricsDisplay::All, now());
        assert!(find(&metrics, "Market Cap").is_none());

        // quote present but both prices zeroed
        let mut dead = full_quote();
        dead.price = Some(0.0);
        dead.last_sale_price = Some(0.0);
        let metrics = format_stock_stats(&stats, Some(&dead), MetricsDisplay::All, now());
        assert!(find(&metrics, "Market Cap").is_none());

        // live price but no shares outstanding
        let mut no_shares = full_stats();
        no_shares.shares_outstanding = None;
        let metrics = format_stock_stats(&no_shares, Some(&quote), MetricsDisplay::All, now());
        assert!(find(&metrics, "Market Cap").is_none());
    }

    #[test]
    fn market_cap_falls_back_to_the_last_sale_price() {
        let mut stats = StockStats::default();
        stats.shares_outstanding = Some(2_000_000_000);
        let mut quote = VnxQuote::default();
        quote.price = Some(0.0);
        quote.last_sale_price = Some(10.0);

        let metrics = format_stock_stats(&stats, Some(&quote), MetricsDisplay::All, now());
        assert_eq!(find(&metrics, "Market Cap").unwrap().value, "$20.00B");
    }

    #[test]
    fn zero_bounds_suppress_range_and_book_metrics() {
        let stats = full_stats();
        let mut quote = full_quote();
        quote.low_price = Some(0.0);
        quote.bid_size = Some(0);

        let metrics = format_stock_stats(&stats, Some(&quote), MetricsDisplay::All, now());
        assert!(find(&metrics, "Day's Range").is_none());
        assert!(find(&metrics, "Bid").is_none());
        // the ask side is untouched and survives
        assert_eq!(find(&metrics, "Ask").unwrap().value, "$189.60 x 300");
    }

    // ------------------------------------------------------------------------------------------
    // sections

    #[test]
    fn fundamentals_filter_hides_performance_and_technical() {
        let stats = full_stats();
        let quote = full_quote();

        let metrics =
            format_stock_stats(&stats, Some(&quote), MetricsDisplay::Fundamentals, now());
        let labels = labels(&metrics);

        assert!(labels.contains(&"Company"));
        assert!(labels.contains(&"P/E Ratio (TTM)"));
        assert!(labels.contains(&"EPS (TTM)"));
        assert!(labels.contains(&"Market Cap"));
        assert!(labels.contains(&"Shares Outstanding"));
        assert!(labels.contains(&"Exchange"));

        assert!(!labels.contains(&"52-Week High"));
        assert!(!labels.contains(&"YTD Change"));
        assert!(!labels.contains(&"Day's Range"));
        assert!(!labels.contains(&"Beta"));
        assert!(!labels.contains(&"50-Day MA"));
        assert!(!labels.contains(&"Volume / 30-Day Avg"));
    }

    #[test]
    fn technical_filter_keeps_only_technical_metrics() {
        let metrics = format_stock_stats(
            &full_stats(),
            Some(&full_quote()),
            MetricsDisplay::Technical,
            now(),
        );
        let labels = labels(&metrics);

        assert!(labels.contains(&"Beta"));
        assert!(labels.contains(&"50-Day MA"));
        assert!(labels.contains(&"200-Day MA"));
        assert!(labels.contains(&"Volume / 30-Day Avg"));
        assert!(!labels.contains(&"P/E Ratio (TTM)"));
        assert!(!labels.contains(&"52-Week Low"));
    }

    // ------------------------------------------------------------------------------------------
    // individual formats

    #[test]
    fn percentage_metrics_carry_a_forced_sign_and_raw_delta() {
        let metrics =
            format_stock_stats(&full_stats(), None, MetricsDisplay::PricePerformance, now());

        let change = find(&metrics, "52-Week Change").unwrap();
        assert_eq!(change.value, "-19.00%");
        assert_eq!(change.delta.as_deref(), Some("-0.1900"));

        let mut stats = StockStats::default();
        stats.ytd_change = Some(0.095);
        let metrics = format_stock_stats(&stats, None, MetricsDisplay::All, now());
        let ytd = find(&metrics, "YTD Change").unwrap();
        assert_eq!(ytd.value, "+9.50%");
        assert_eq!(ytd.delta.as_deref(), Some("0.0950"));
    }

    #[test]
    fn volume_comparison_degrades_stepwise() {
        let stats = full_stats();
        let quote = full_quote();

        // both inputs: combined display with the relative delta
        let metrics = format_stock_stats(&stats, Some(&quote), MetricsDisplay::Technical, now());
        let volume = find(&metrics, "Volume / 30-Day Avg").unwrap();
        assert_eq!(volume.value, "600.00K / 500.00K");
        assert_eq!(volume.delta.as_deref(), Some("0.2000"));

        // no quote: average only
        let metrics = format_stock_stats(&stats, None, MetricsDisplay::Technical, now());
        assert_eq!(
            find(&metrics, "Avg 30-Day Volume").unwrap().value,
            "500.00K"
        );

        // no average either: omitted
        let mut bare = full_stats();
        bare.avg_30_day_volume = None;
        let metrics = format_stock_stats(&bare, None, MetricsDisplay::Technical, now());
        assert!(find(&metrics, "Avg 30-Day Volume").is_none());
        assert!(find(&metrics, "Volume / 30-Day Avg").is_none());
    }

    #[test]
    fn exchange_codes_map_to_venue_names() {
        let metrics =
            format_stock_stats(&full_stats(), None, MetricsDisplay::Fundamentals, now());
        let exchange = find(&metrics, "Exchange").unwrap();
        assert_eq!(exchange.value, "New York Stock Exchange");
        assert_eq!(exchange.description.as_deref(), Some("MIC: XNYS"));
    }

    #[test]
    fn unknown_exchange_codes_pass_through_verbatim() {
        let mut stats = StockStats::default();
        stats.mic = Some("XXXX".to_string());

        let metrics = format_stock_stats(&stats, None, MetricsDisplay::All, now());
        let exchange = find(&metrics, "Exchange").unwrap();
        assert_eq!(exchange.value, "XXXX");
        assert_eq!(exchange.description.as_deref(), Some("MIC: XXXX"));
    }

    #[test]
    fn absent_description_and_delta_are_not_serialized() {
        let value = serde_json::to_value(Metric::new("Company", "Acme Co")).unwrap();
        assert!(value.get("description").is_none());
        assert!(value.get("delta").is_none());
    }

    // ------------------------------------------------------------------------------------------
    // the documented end-to-end example

    #[test]
    fn example_record_formats_as_documented() {
        let stats: StockStats = serde_json::from_str(
            r#"{
                "issuerName": "Acme Co",
                "symbol": "ACM",
                "52weekHigh": 100.00,
                "52weekHighDate": "2025-01-01",
                "avg30DayVolume": 500000,
                "sharesOutstanding": 2000000000
            }"#,
        )
        .unwrap();

        let metrics = format_stock_stats(&stats, None, MetricsDisplay::All, now());

        assert_eq!(find(&metrics, "Company").unwrap().value, "Acme Co (ACM)");

        let high = find(&metrics, "52-Week High").unwrap();
        assert_eq!(high.value, "$100.00");
        assert_eq!(high.description.as_deref(), Some("Date: 2025-01-01"));

        assert_eq!(
            find(&metrics, "Avg 30-Day Volume").unwrap().value,
            "500.00K"
        );
        assert_eq!(
            find(&metrics, "Shares Outstanding").unwrap().value,
            "2.00B"
        );

        // no live price, so no market cap
        assert!(find(&metrics, "Market Cap").is_none());
        assert_eq!(metrics.len(), 4);
    }
}
