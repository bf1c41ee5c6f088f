use std::io::Error as IoError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sitewatch_service::config::ConfigError;
use sitewatch_service::registry::RegistryError;
use thiserror::Error;
use tracing::error;

use crate::routes::sites::ApiMessage;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Startup failed: {0:#}")]
    Startup(anyhow::Error),
}

/// Error returned by API handlers, rendered as `{"status": "error", "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The request body could not be read as the expected JSON.
    #[error("Invalid request body: {0}")]
    Payload(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Payload(_) | ApiError::Registry(RegistryError::InvalidRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Registry(RegistryError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Registry(RegistryError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Registry(RegistryError::Store(e)) => {
                error!("Status store failure while handling request: {e}");
                "Status store unavailable.".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ApiMessage::error(message))
    }
}
