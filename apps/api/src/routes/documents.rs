//! Axum route handlers for direct Google Docs access.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::docs::GoogleDocsClient;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReadDocumentRequest {
    pub document_id: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentQuery {
    pub title: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentQuery {
    pub document_id: String,
    pub content: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse<T> {
    pub document: T,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

async fn docs_client(state: &AppState, user_id: &str) -> Result<GoogleDocsClient, AppError> {
    let token = state.credentials.access_token(user_id).await?;
    Ok(GoogleDocsClient::new(state.http.clone(), token))
}

/// POST /docs/read
pub async fn handle_read_document(
    State(state): State<AppState>,
    Json(request): Json<ReadDocumentRequest>,
) -> Result<Json<DocumentResponse<Value>>, AppError> {
    let client = docs_client(&state, &request.user_id).await?;
    let document = client.get_document(&request.document_id).await?;
    Ok(Json(DocumentResponse { document }))
}

/// POST /docs/create
pub async fn handle_create_document(
    State(state): State<AppState>,
    Query(query): Query<CreateDocumentQuery>,
) -> Result<Json<DocumentResponse<String>>, AppError> {
    let client = docs_client(&state, &query.user_id).await?;
    let document = client.create_document(&query.title).await?;
    Ok(Json(DocumentResponse { document }))
}

/// POST /docs/update
///
/// Inserts `content` at the start of the document body.
pub async fn handle_update_document(
    State(state): State<AppState>,
    Query(query): Query<UpdateDocumentQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let client = docs_client(&state, &query.user_id).await?;
    client
        .insert_text(&query.document_id, &query.content)
        .await?;
    Ok(Json(StatusResponse { status: "success" }))
}
