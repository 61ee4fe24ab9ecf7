//! Axum route handler for AI-tailored résumé publishing.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::docs::{DocumentIdentity, GoogleDocsClient};
use crate::errors::AppError;
use crate::models::language::Language;
use crate::models::resume::load_resume_data;
use crate::pipeline::tailor_and_publish;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub job_description: String,
    /// Rejected by deserialization unless `en` or `kr`.
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: &'static str,
    pub document: DocumentIdentity,
}

/// POST /resume/generate-with-ai
///
/// Tailors the stored base résumé to the job description and publishes it as
/// a new Google Doc copied from the language's template.
pub async fn handle_generate_with_ai(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<GenerateResponse>, AppError> {
    if query.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let token = state
        .credentials
        .access_token(&state.config.test_user_email)
        .await?;
    let base = load_resume_data(&state.config.resume_data_path).await?;
    let store = GoogleDocsClient::new(state.http.clone(), token);

    let document = tailor_and_publish(
        state.llm.as_ref(),
        &store,
        &state.templates,
        &query.job_description,
        query.language,
        &base,
    )
    .await?;

    info!("Resume created: {}", document.id);

    Ok(Json(GenerateResponse {
        message: "Resume created successfully",
        document,
    }))
}
