use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::multipart_parser::MultipartParser;
use super::AppState;
use crate::declaration::load_declaration;
use crate::informe::{generate_all, GenerationReport};
use crate::ErrorResponse;

pub const COUNT_HEADER: &str = "X-Informes-Count";
pub const YEAR_HEADER: &str = "X-Ano-Calendario";

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateInformesRequest {
    /// DIRF text export.
    #[allow(unused)]
    pub declaration: Vec<u8>,
    /// Optional PNG/JPEG logo placed at the top of every informe.
    #[allow(unused)]
    pub logo: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Informe Service",
    post,
    path = "/informes",
    request_body(content = inline(GenerateInformesRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Zip archive (application/zip) with one PDF per beneficiary"),
        (status = 400, description = "Missing declaration file or malformed upload", body = ErrorResponse),
        (status = 413, description = "Uploaded file too large", body = ErrorResponse),
        (status = 500, description = "Informe generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_informes(payload: Multipart, state: web::Data<AppState>) -> impl Responder {
    let run_id = Uuid::new_v4();
    info!("[{}] Executing generate_informes handler", run_id);

    let upload = match MultipartParser::parse_informe_multipart(payload, state.config.max_upload_bytes)
        .await
    {
        Ok(upload) => upload,
        Err(e) => {
            error!("[{}] Rejected upload: {}", run_id, e);
            return HttpResponse::from(e);
        }
    };

    info!(
        "[{}] Received '{}' ({} bytes), logo: {}",
        run_id,
        upload.declaration_filename,
        upload.declaration.len(),
        upload.logo.is_some()
    );

    let config = state.config.informe.clone();
    let result = web::block(move || {
        let text = load_declaration(&upload.declaration);
        let report = generate_all(&text, upload.logo.as_deref(), &config)?;
        let archive = report.to_zip()?;
        Ok::<_, crate::informe::GeneratorError>((report, archive))
    })
    .await;

    match result {
        Ok(Ok((report, archive))) => {
            info!(
                "[{}] {} informes generated for ano-calendário {}",
                run_id, report.count, report.fiscal_year
            );
            zip_response(&report, archive)
        }
        Ok(Err(e)) => {
            error!("[{}] Informe generation failed: {}", run_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
        Err(e) => {
            error!("[{}] Blocking task failed: {}", run_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Informe generation was interrupted"))
        }
    }
}

fn zip_response(report: &GenerationReport, archive: Vec<u8>) -> HttpResponse {
    let year: String = report
        .fiscal_year
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report.archive_name())],
        })
        .insert_header((COUNT_HEADER, report.count.to_string()))
        .insert_header((YEAR_HEADER, year))
        .body(archive)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Informe Service",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}
