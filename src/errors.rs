use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::booking::AdmissionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(anyhow::Error),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            AppError::Admission(err) => (admission_status(err), err.kind()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        };

        let body = serde_json::json!({ "error": self.to_string(), "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}

fn admission_status(err: &AdmissionError) -> StatusCode {
    match err {
        AdmissionError::NotFound(_) => StatusCode::NOT_FOUND,
        AdmissionError::OutOfWindow(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionError::OutOfHorizon(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionError::SlotFull(_) => StatusCode::CONFLICT,
        AdmissionError::Validation(_) => StatusCode::BAD_REQUEST,
        AdmissionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
