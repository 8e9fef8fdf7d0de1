use crate::config::ConfigError;
use crate::import::ImportError;
use crate::telemetry::TelemetryError;
use crate::xp::{XpConfigError, XpError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Serialize(serde_json::Error),
    Import(ImportError),
    Xp(XpError),
    ArtifactExists(PathBuf),
    Worker(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Serialize(err) => write!(f, "failed to serialize xp artifact: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Xp(err) => write!(f, "xp error: {}", err),
            AppError::ArtifactExists(path) => write!(
                f,
                "{} already exists (pass --force to overwrite)",
                path.display()
            ),
            AppError::Worker(err) => write!(f, "xp worker failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Serialize(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Xp(err) => Some(err),
            AppError::ArtifactExists(_) | AppError::Worker(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Xp(_) | AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Serialize(_)
            | AppError::ArtifactExists(_)
            | AppError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<XpError> for AppError {
    fn from(value: XpError) -> Self {
        Self::Xp(value)
    }
}

impl From<XpConfigError> for AppError {
    fn from(value: XpConfigError) -> Self {
        Self::Xp(XpError::Config(value))
    }
}
