use crate::WidgetError;
use serde::Serialize;
use vnx_data::StockStats;

const MA50_COLOR: &str = "#00B140";
const MA200_COLOR: &str = "#FF8000";
const GRID_COLOR: &str = "rgba(128, 128, 128, 0.2)";
const TRANSPARENT: &str = "rgba(0,0,0,0)";
const FONT_COLOR: &str = "#ffffff";

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Figure document
//
// Plotly-shaped JSON, rendered by the dashboard as-is:
//
//      {
//          "data": [ { "x": [...], "y": [...], "name": "50-Day MA", ... }, ... ],
//          "layout": { "paper_bgcolor": "rgba(0,0,0,0)", ... }
//      }
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct ChartFigure {
    pub data: Vec<Series>,
    pub layout: Layout,
}

/// One line of the figure. Both series share the x-axis dates; `y` carries
/// `null` where a record had no value so positions stay aligned.
#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Series {
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub mode: String,
    pub name: String,
    pub line: Line,
    pub marker: Marker,
    pub hovertemplate: String,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Line {
    pub color: String,
    pub width: u32,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Marker {
    pub size: u32,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Layout {
    pub title: String,
    pub showlegend: bool,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub margin: Margin,
    pub hovermode: String,
    pub hoverlabel: HoverLabel,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Font {
    pub color: String,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub showgrid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    pub color: String,
    pub linecolor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<String>,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

#[derive(Serialize, Debug, Clone, utoipa::ToSchema)]
pub struct HoverLabel {
    pub bgcolor: String,
    pub font_color: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembly
//
////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Assemble the moving-average chart for `symbol` from its fetched history.
///
/// Records keep input order. A record with no date is skipped outright; a
/// dated record missing either average contributes a `null` at its position
/// in that series, so the two series and the date axis never drift apart.
pub fn build_chart(records: &[StockStats], symbol: &str) -> Result<ChartFigure, WidgetError> {
    if records.is_empty() {
        return Err(WidgetError::NotFound(symbol.to_string()));
    }

    let mut dates = Vec::with_capacity(records.len());
    let mut ma_50 = Vec::with_capacity(records.len());
    let mut ma_200 = Vec::with_capacity(records.len());
    for record in records {
        if let Some(date) = &record.date {
            dates.push(date.clone());
            ma_50.push(record.day_50_moving_average);
            ma_200.push(record.day_200_moving_average);
        }
    }

    if dates.is_empty() {
        return Err(WidgetError::InsufficientData(symbol.to_string()));
    }

    let data = vec![
        series(dates.clone(), ma_50, "50-Day MA", MA50_COLOR),
        series(dates, ma_200, "200-Day MA", MA200_COLOR),
    ];

    Ok(ChartFigure {
        data,
        layout: dark_layout(symbol),
    })
}

fn series(x: Vec<String>, y: Vec<Option<f64>>, name: &str, color: &str) -> Series {
    Series {
        x,
        y,
        mode: "lines+markers".to_string(),
        name: name.to_string(),
        line: Line {
            color: color.to_string(),
            width: 2,
        },
        marker: Marker { size: 4 },
        hovertemplate: format!("<b>%{{x}}</b><br>{name}: $%{{y:.2f}}<extra></extra>"),
    }
}

/// Fixed dark theme. The x-axis is a date axis, so its title stays hidden.
fn dark_layout(symbol: &str) -> Layout {
    Layout {
        title: format!("{symbol} - Moving Averages (1 Month)"),
        showlegend: true,
        paper_bgcolor: TRANSPARENT.to_string(),
        plot_bgcolor: TRANSPARENT.to_string(),
        font: Font {
            color: FONT_COLOR.to_string(),
        },
        xaxis: Axis {
            title: None,
            showgrid: false,
            gridcolor: None,
            color: FONT_COLOR.to_string(),
            linecolor: GRID_COLOR.to_string(),
            tickformat: None,
        },
        yaxis: Axis {
            title: Some("Price (USD)".to_string()),
            showgrid: true,
            gridcolor: Some(GRID_COLOR.to_string()),
            color: FONT_COLOR.to_string(),
            linecolor: GRID_COLOR.to_string(),
            tickformat: Some("$,.2f".to_string()),
        },
        margin: Margin {
            b: 40,
            l: 80,
            r: 20,
            t: 40,
        },
        hovermode: "x unified".to_string(),
        hoverlabel: HoverLabel {
            bgcolor: "white".to_string(),
            font_color: "black".to_string(),
        },
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
