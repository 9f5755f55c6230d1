//! Mapping from failures to HTTP responses.
//!
//! Validation and missing-record errors carry client-facing detail;
//! everything else is logged and reported as a generic 500.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use urban_alerts_analytics::AnalyticsError;
use urban_alerts_database::DbError;
use urban_alerts_server_models::{ApiResponse, FieldError};

/// Message returned for any 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor.";

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more body fields failed validation (422).
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The referenced alert does not exist (404).
    #[error("Alerta #{0} não encontrado.")]
    NotFound(String),

    /// The request body could not be parsed as JSON (400).
    #[error("Corpo da requisição inválido.")]
    MalformedBody(String),

    /// Anything else (500). The message is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { id } => Self::NotFound(id.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(e: AnalyticsError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Validation(errors) => ApiResponse::invalid(errors.clone()),
            Self::NotFound(_) => {
                log::debug!("{self}");
                ApiResponse::failure(self.to_string())
            }
            Self::MalformedBody(detail) => {
                log::debug!("Rejected request body: {detail}");
                ApiResponse::failure(self.to_string())
            }
            Self::Internal(message) => {
                log::error!("Request failed: {message}");
                ApiResponse::failure(INTERNAL_ERROR_MESSAGE)
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
