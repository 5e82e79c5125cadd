use crate::error::ApiError;
use crate::AppState;
use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use vnx_data::{StockStats, VnxQuote};
use vnx_widgets::registry::{GridData, WidgetConfig, WidgetKind, WidgetParam, WidgetRegistry};
use vnx_widgets::{build_chart, format_stock_stats, ChartFigure, Metric, MetricsDisplay};

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Widget descriptors
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Descriptors for both stock widgets; recorded before the server binds.
pub fn register_widgets(registry: &mut WidgetRegistry) {
    registry.register(WidgetConfig {
        name: "Stock Statistics".to_string(),
        description: "Key stock statistics and metrics powered by Vianexus".to_string(),
        category: "Stock Data".to_string(),
        endpoint: "stock_stats".to_string(),
        kind: WidgetKind::Metric,
        grid_data: GridData { w: 12, h: 8 },
        params: vec![
            WidgetParam::text(
                "symbol",
                "AAPL",
                "Stock Symbol",
                "Enter a stock ticker symbol (e.g., AAPL, MSFT, GOOGL)",
            ),
            WidgetParam::select(
                "metrics_display",
                "all",
                "Metrics Display",
                &[
                    ("All", "all"),
                    ("Price Performance", "price_performance"),
                    ("Fundamentals", "fundamentals"),
                    ("Technical", "technical"),
                ],
            ),
        ],
        raw: false,
        widget_id: None,
    });

    registry.register(WidgetConfig {
        name: "Stock Price Chart".to_string(),
        description: "Historical moving averages (1 month)".to_string(),
        category: "Stock Data".to_string(),
        endpoint: "stock_chart".to_string(),
        kind: WidgetKind::Chart,
        grid_data: GridData { w: 12, h: 8 },
        params: vec![WidgetParam::text(
            "symbol",
            "AAPL",
            "Stock Symbol",
            "Enter a stock ticker symbol (e.g., AAPL, MSFT, GOOGL)",
        )],
        raw: true,
        widget_id: None,
    });
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Handlers
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct StatsQuery {
    symbol: Option<String>,
    metrics_display: Option<MetricsDisplay>,
}

/// Stock statistics metrics
#[utoipa::path(
    get,
    path = "/stock_stats",
    responses(
        (
            status = 200, description = "Ordered metric list for the symbol",
            body = [Metric], content_type = "application/json",
            example = json!([
                { "label": "Company", "value": "Apple Inc (AAPL)" },
                { "label": "52-Week Change", "value": "-19.00%", "delta": "-0.1900" }
            ])
        ),
        (status = 404, description = "No data for the symbol"),
        (status = 500, description = "Upstream fetch failed")
    ),
    params(
        ("symbol" = Option<String>, Query, description = "Stock ticker symbol; defaults to AAPL"),
        ("metrics_display" = Option<String>, Query, description = "Section filter: all, price_performance, fundamentals or technical")
    )
)]
#[get("/stock_stats")]
pub async fn stock_stats(
    query: web::Query<StatsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let symbol = query
        .symbol
        .clone()
        .unwrap_or_else(|| "AAPL".to_string())
        .to_uppercase();
    let display = query.metrics_display.unwrap_or_default();

    // the daily record is mandatory
    let records: Vec<StockStats> = state
        .stock_stats
        .fetch(&state.http, &[symbol.as_str()], 1)
        .await
        .map_err(|e| ApiError::upstream("data", &symbol, e))?;
    let stats = records
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(symbol.clone()))?;

    // the quote is best-effort: losing it degrades the output, not the request
    let quote: Option<VnxQuote> = match state
        .vnx_quote
        .fetch(&state.http, &[symbol.as_str()], 1)
        .await
    {
        Ok(mut records) if !records.is_empty() => Some(records.remove(0)),
        Ok(_) => {
            log::debug!("no quote records for {symbol}");
            None
        }
        Err(e) => {
            log::warn!("quote fetch failed for {symbol}, continuing without it: {e}");
            None
        }
    };

    let metrics = format_stock_stats(&stats, quote.as_ref(), display, Utc::now());
    Ok(HttpResponse::Ok().json(metrics))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct ChartQuery {
    symbol: Option<String>,
}

/// Historical moving-average chart
#[utoipa::path(
    get,
    path = "/stock_chart",
    responses(
        (status = 200, description = "Plotly-shaped figure for the symbol", body = ChartFigure, content_type = "application/json"),
        (status = 404, description = "No or insufficient history for the symbol"),
        (status = 500, description = "Upstream fetch failed")
    ),
    params(
        ("symbol" = Option<String>, Query, description = "Stock ticker symbol; defaults to AAPL")
    )
)]
#[get("/stock_chart")]
pub async fn stock_chart(
    query: web::Query<ChartQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let symbol = query
        .symbol
        .clone()
        .unwrap_or_else(|| "AAPL".to_string())
        .to_uppercase();

    // one month of history
    let records: Vec<StockStats> = state
        .stock_stats
        .fetch(&state.http, &[symbol.as_str()], 30)
        .await
        .map_err(|e| ApiError::upstream("chart data", &symbol, e))?;

    let figure = build_chart(&records, &symbol)?;
    Ok(HttpResponse::Ok().json(figure))
}
