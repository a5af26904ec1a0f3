use actix_multipart::{Field, Multipart};
use actix_web::HttpResponse;
use futures::StreamExt;
use log::debug;
use sanitize_filename::sanitize;

use crate::ErrorResponse;

pub const DECLARATION_FIELD: &str = "declaration";
pub const LOGO_FIELD: &str = "logo";

/// Files received by the informe upload endpoint.
#[derive(Debug, Default)]
pub struct InformeUpload {
    pub declaration: Vec<u8>,
    pub declaration_filename: String,
    pub logo: Option<Vec<u8>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field '{field}' exceeds the limit of {limit} bytes")]
    TooLarge { field: String, limit: usize },
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::FieldError(_) | MultipartParseError::MissingField(_) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
            }
            MultipartParseError::TooLarge { .. } => HttpResponse::PayloadTooLarge()
                .json(ErrorResponse::new("PayloadTooLarge", &error.to_string())),
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    pub async fn parse_informe_multipart(
        mut multipart: Multipart,
        max_bytes: usize,
    ) -> Result<InformeUpload, MultipartParseError> {
        let mut upload = InformeUpload::default();
        let mut has_declaration = false;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| MultipartParseError::FieldError("Content disposition not found".to_string()))?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let filename = content_disposition.get_filename().map(|f| sanitize(f));

            match name.as_str() {
                DECLARATION_FIELD => {
                    upload.declaration = read_field(&mut field, &name, max_bytes).await?;
                    upload.declaration_filename =
                        filename.unwrap_or_else(|| "declaration.txt".to_string());
                    has_declaration = true;
                }
                LOGO_FIELD => {
                    let bytes = read_field(&mut field, &name, max_bytes).await?;
                    upload.logo = Some(bytes).filter(|b| !b.is_empty());
                }
                _ => {
                    debug!("Skipping unknown multipart field '{}'", name);
                    continue;
                }
            }
        }

        if !has_declaration || upload.declaration.is_empty() {
            return Err(MultipartParseError::MissingField(DECLARATION_FIELD));
        }

        Ok(upload)
    }
}

async fn read_field(
    field: &mut Field,
    name: &str,
    max_bytes: usize,
) -> Result<Vec<u8>, MultipartParseError> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
        if buffer.len() + data_chunk.len() > max_bytes {
            return Err(MultipartParseError::TooLarge {
                field: name.to_string(),
                limit: max_bytes,
            });
        }
        buffer.extend_from_slice(&data_chunk);
    }
    Ok(buffer)
}
