use crate::error::ApiError;
use actix_web::{get, web, HttpResponse, Responder};
use dotenv::var;
use serde_json::json;
use vnx_widgets::WidgetRegistry;

////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Liveness/info payload
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Basic backend information")
    )
)]
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "Info": "Vianexus Stock Stats Widget Backend" }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Widget discovery manifest
///
/// Everything the widget modules registered at startup, keyed by widget id.
#[utoipa::path(
    get,
    path = "/widgets.json",
    responses(
        (status = 200, description = "All registered widgets, keyed by widget id")
    )
)]
#[get("/widgets.json")]
pub async fn widgets_json(registry: web::Data<WidgetRegistry>) -> impl Responder {
    HttpResponse::Ok().json(registry.list_all())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Static app manifest
///
/// Loaded verbatim from `documents/apps.json` on every request (override
/// the path with `APPS_MANIFEST`), never generated.
#[utoipa::path(
    get,
    path = "/apps.json",
    responses(
        (status = 200, description = "App manifest document"),
        (status = 500, description = "Manifest unreadable")
    )
)]
#[get("/apps.json")]
pub async fn apps_json() -> Result<HttpResponse, ApiError> {
    let path = var("APPS_MANIFEST").unwrap_or_else(|_| "documents/apps.json".to_string());
    let document = read_json::<serde_json::Value>(&path).await.map_err(|e| {
        log::error!("failed loading app manifest from {path}: {e}");
        ApiError::Manifest(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(document))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let file = tokio::fs::read(path).await?;
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}
