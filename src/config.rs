//! Service configuration read from the environment (and `.env`).

use std::path::PathBuf;

use thiserror::Error;

use crate::informe::InformeConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for each uploaded file.
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
    pub informe: InformeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            informe: InformeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from process environment after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("INFORME_HOST") {
            config.host = host;
        }
        if let Some(port) = get("INFORME_PORT") {
            config.port = parse_value("INFORME_PORT", &port)?;
        }
        if let Some(max) = get("INFORME_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_value("INFORME_MAX_UPLOAD_BYTES", &max)?;
        }
        if let Some(origins) = get("INFORME_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(bin) = get("TYPST_BIN") {
            config.informe.typst_bin = PathBuf::from(bin);
        }
        if let Some(date) = get("INFORME_SIGNATURE_DATE") {
            config.informe.signature_date = date;
        }
        if let Some(footer) = get("INFORME_FOOTER") {
            config.informe.footer = footer;
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
