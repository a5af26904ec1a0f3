//! HTTP driver: upload a declaration, download the zip of informes.

pub mod handlers;
pub mod multipart_parser;

use actix_web::web;
use utoipa::OpenApi;

use crate::config::AppConfig;

/// Shared, read-only state for the handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::generate_informes, handlers::health),
    components(schemas(
        handlers::GenerateInformesRequest,
        handlers::HealthResponse,
        crate::ErrorResponse,
    )),
    tags((name = "Informe Service", description = "Informe de rendimentos generation from DIRF files."))
)]
pub struct ApiDoc;

/// Register the `/api` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/informes").route(web::post().to(handlers::generate_informes)))
            .service(web::resource("/health").route(web::get().to(handlers::health))),
    );
}
