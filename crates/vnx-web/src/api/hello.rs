use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use vnx_widgets::registry::{GridData, WidgetConfig, WidgetKind, WidgetParam, WidgetRegistry};

/// Demo markdown widget; recorded before the server binds.
pub fn register_widgets(registry: &mut WidgetRegistry) {
    registry.register(WidgetConfig {
        name: "Hello World".to_string(),
        description: "A simple markdown greeting".to_string(),
        category: "Examples".to_string(),
        endpoint: "hello_world".to_string(),
        kind: WidgetKind::Markdown,
        grid_data: GridData { w: 12, h: 4 },
        params: vec![WidgetParam::text(
            "name",
            "",
            "Name",
            "Name to include in the greeting",
        )],
        raw: false,
        widget_id: None,
    });
}

#[derive(Deserialize, Debug)]
pub struct HelloQuery {
    name: Option<String>,
}

/// Markdown greeting (demo widget)
#[utoipa::path(
    get,
    path = "/hello_world",
    responses(
        (status = 200, description = "Greeting in markdown", body = String, content_type = "application/json",
         example = json!("# Hello World Ada"))
    ),
    params(
        ("name" = Option<String>, Query, description = "Name to include in the greeting")
    )
)]
#[get("/hello_world")]
pub async fn hello_world(query: web::Query<HelloQuery>) -> impl Responder {
    let name = query.name.clone().unwrap_or_default();
    HttpResponse::Ok().json(format!("# Hello World {name}"))
}
