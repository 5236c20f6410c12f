// src/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

use crate::application::use_cases::predict_annotations::PredictionError;
use crate::core::platform::container::cas::CasError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Schema error: {0}")]
    Schema(CasError),

    #[error("Document error: {0}")]
    Store(CasError),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MalformedRequest(_) => "MALFORMED_REQUEST",
            ServiceError::Schema(_) => "SCHEMA_ERROR",
            ServiceError::Store(_) => "STORE_ERROR",
            ServiceError::Prediction(_) => "PREDICTION_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<PredictionError> for ServiceError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::TypeSystem(e) => ServiceError::Schema(e),
            PredictionError::Cas(e) if e.is_schema_error() => ServiceError::Schema(e),
            PredictionError::Cas(e) => ServiceError::Store(e),
            PredictionError::Serialization(e) => ServiceError::Internal(e.to_string()),
            other @ (PredictionError::Nlp(_)
            | PredictionError::InvalidEntitySpan { .. }
            | PredictionError::TagCountMismatch { .. }) => ServiceError::Prediction(other.to_string()),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedRequest(_) | ServiceError::Schema(_) | ServiceError::Store(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Prediction(_) | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{} ({})", self, self.code());
        } else {
            warn!("{} ({})", self, self.code());
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        })
    }
}
