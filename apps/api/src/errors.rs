use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::docs::client::DocsError;
use crate::generation::schema::Stage;
use crate::models::resume::ResumeDataError;

/// Failures of the tailoring pipeline. Every variant names the stage or
/// document operation it came from, so callers can tell an AI generation
/// problem apart from a document publishing problem.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("{stage} generation failed: {cause}")]
    GenerationFailure { stage: Stage, cause: String },

    #[error("{stage} response did not match its schema: {reason}")]
    SchemaMismatch {
        stage: Stage,
        reason: String,
        raw: String,
    },

    #[error("Failed to copy template {template_id}: {cause}")]
    DocumentCreationFailure { template_id: String, cause: String },

    #[error("Failed to populate document {document_id}: {cause}")]
    DocumentAssemblyFailure { document_id: String, cause: String },
}

impl TailorError {
    pub fn is_generation_error(&self) -> bool {
        matches!(
            self,
            TailorError::GenerationFailure { .. } | TailorError::SchemaMismatch { .. }
        )
    }

    /// The model output that failed its schema, if any.
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            TailorError::SchemaMismatch { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TailorError> for AppError {
    fn from(err: TailorError) -> Self {
        if err.is_generation_error() {
            AppError::Generation(err.to_string())
        } else {
            AppError::Document(err.to_string())
        }
    }
}

impl From<DocsError> for AppError {
    fn from(err: DocsError) -> Self {
        AppError::Document(err.to_string())
    }
}

impl From<ResumeDataError> for AppError {
    fn from(err: ResumeDataError) -> Self {
        if matches!(err, ResumeDataError::NotFound(_)) {
            AppError::NotFound(err.to_string())
        } else {
            AppError::Internal(anyhow::Error::new(err))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Credentials not found".to_string(),
            ),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", msg.clone())
            }
            AppError::Document(msg) => {
                tracing::error!("Document error: {msg}");
                (StatusCode::BAD_GATEWAY, "DOCUMENT_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
