//! Axum route handlers for the Google OAuth flow.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub status: &'static str,
    pub user_id: String,
}

/// GET /auth/google
///
/// Returns the Google consent-screen URL.
pub async fn handle_google_auth(
    State(state): State<AppState>,
) -> Result<Json<AuthUrlResponse>, AppError> {
    Ok(Json(AuthUrlResponse {
        url: state.oauth.authorization_url()?,
    }))
}

/// GET /auth/google/callback
///
/// Exchanges the authorization code and stores the credentials under the
/// configured user.
pub async fn handle_google_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<CallbackResponse>, AppError> {
    let user_id = state.config.test_user_email.clone();
    let credentials = state.oauth.exchange_code(&query.code).await?;
    state.credentials.save(&user_id, &credentials).await?;

    Ok(Json(CallbackResponse {
        status: "success",
        user_id,
    }))
}
