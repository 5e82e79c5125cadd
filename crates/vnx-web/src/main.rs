use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use dotenv::{dotenv, var};
use utoipa::OpenApi;

use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use vnx_data::{Dataset, Settings};
use vnx_widgets::WidgetRegistry;

mod api;
mod cli;
mod error;

/// Shared request context: the one HTTP client and the two upstream dataset
/// endpoints. Read-only once the server is up.
pub struct AppState {
    pub http: reqwest::Client,
    pub stock_stats: Dataset,
    pub vnx_quote: Dataset,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let cli = cli::Cli::parse();

    // default level from the CLI, per-module overrides from the environment
    let mut filters = cli.trace.as_directive().to_string();
    if let Ok(modules) = var("MODULE_LOG_LEVELS") {
        filters = format!("{filters},{modules}");
    }
    env_logger::Builder::new().parse_filters(&filters).init();

    // upstream configuration from .env
    let settings = Settings::from_env().expect("VIANEXUS_API_KEY must be set");
    let state = web::Data::new(AppState {
        http: reqwest::Client::new(),
        stock_stats: Dataset::stock_stats(&settings),
        vnx_quote: Dataset::vnx_quote(&settings),
    });

    // every widget module records its descriptors before the server binds;
    // the registry is only read from here on
    let mut registry = WidgetRegistry::new();
    api::stock::register_widgets(&mut registry);
    api::hello::register_widgets(&mut registry);
    let registry = web::Data::new(registry);

    // create API documentation
    use api::*;
    #[derive(OpenApi)]
    #[openapi(paths(
        manifest::root,
        manifest::widgets_json,
        manifest::apps_json,
        stock::stock_stats,
        stock::stock_chart,
        hello::hello_world,
    ))]
    struct ApiDoc;
    let openapi = ApiDoc::openapi();

    log::info!("widget backend listening on {}:{}", cli.bind, cli.port);

    // run server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(registry.clone())
            // widget endpoints
            .service(manifest::root)
            .service(manifest::widgets_json)
            .service(manifest::apps_json)
            .service(stock::stock_stats)
            .service(stock::stock_chart)
            .service(hello::hello_world)
            // api documentation
            .service(RapiDoc::with_openapi("/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
            .service(Redoc::with_url("/redoc", ApiDoc::openapi()))
            .service(Scalar::with_url("/scalar", ApiDoc::openapi()))
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/openapi.json", openapi.clone()))
    })
    .bind((cli.bind.as_str(), cli.port))?
    .run()
    .await
}
