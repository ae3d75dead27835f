use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{error::InternalError, http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod asset;
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::db::AppState;
pub use crate::error::CatalogError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::asset::handlers::register_asset,
        crate::asset::handlers::list_courses,
        crate::asset::handlers::list_my_courses,
        crate::asset::handlers::list_purchased_courses,
        crate::asset::handlers::get_course,
        crate::asset::handlers::purchase_course,
        crate::asset::handlers::list_assets_legacy,
        crate::health::health_check
    ),
    components(
        schemas(
            asset::models::Asset,
            asset::models::RegisterAssetRequest,
            asset::models::PurchaseRequest,
            health::HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Catalog Service", description = "Asset registration, marketplace listing and purchase records."),
        (name = "Health", description = "Liveness check.")
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Local server")
    )
)]
pub struct ApiDoc;

/// Malformed or missing JSON bodies are answered with the shared error body
/// instead of actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected request body: {}", err);
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Registers every catalog route plus the health check. Shared by the
/// server and the integration tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::scope("/api").configure(asset::handlers::config))
        .configure(health::config);
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new_with_config(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to connect to database. Please check DATABASE_URL in .env and ensure the database is running. Error: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("asset_catalog")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let openapi = ApiDoc::openapi();
    let cors_origins = config.cors_allowed_origins.clone();
    let server_state = app_state.clone();

    log::info!(
        "Starting server at http://{}:{} ({} store)",
        config.host,
        config.port,
        config.store_backend
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&cors_origins))
            .app_data(server_state.clone())
            .configure(configure_app)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", openapi.clone()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("Server stopped, releasing store connection");
    app_state.shutdown().await;
    Ok(())
}
