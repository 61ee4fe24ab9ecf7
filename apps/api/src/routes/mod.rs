pub mod auth;
pub mod documents;
pub mod health;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Google OAuth
        .route("/auth/google", get(auth::handle_google_auth))
        .route("/auth/google/callback", get(auth::handle_google_callback))
        // Google Docs
        .route("/docs/read", post(documents::handle_read_document))
        .route("/docs/create", post(documents::handle_create_document))
        .route("/docs/update", post(documents::handle_update_document))
        // Tailored résumé
        .route(
            "/resume/generate-with-ai",
            post(resume::handle_generate_with_ai),
        )
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::credentials::{CredentialProvider, StoredCredentials};
    use crate::auth::OAuthClient;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::llm_client::stub::StubGenerator;

    /// Holds no credentials for anyone.
    struct EmptyCredentials;

    #[async_trait]
    impl CredentialProvider for EmptyCredentials {
        async fn access_token(&self, _user_id: &str) -> Result<String, AppError> {
            Err(AppError::Unauthorized)
        }

        async fn save(&self, _user_id: &str, _creds: &StoredCredentials) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn test_state() -> AppState {
        let config = Config {
            gemini_api_key: "test-key".to_string(),
            template_id: "EN_TEMPLATE_ID".to_string(),
            korean_template_id: "KR_TEMPLATE_ID".to_string(),
            google_client_id: "client-123".to_string(),
            google_client_secret: "secret".to_string(),
            google_redirect_uri: "http://localhost:8002/auth/google/callback".to_string(),
            test_user_email: "jane@example.com".to_string(),
            resume_data_path: "does/not/exist.toml".into(),
            credentials_dir: "does/not/exist".into(),
            port: 8002,
            rust_log: "info".to_string(),
        };
        let http = reqwest::Client::new();

        AppState {
            oauth: OAuthClient::new(
                http.clone(),
                config.google_client_id.clone(),
                config.google_client_secret.clone(),
                config.google_redirect_uri.clone(),
            ),
            templates: config.template_ids(),
            llm: Arc::new(StubGenerator::default()),
            credentials: Arc::new(EmptyCredentials),
            http,
            config,
        }
    }

    async fn send(method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health_reports_service() {
        let (status, body) = send("GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "resume-tailor-api");
    }

    #[tokio::test]
    async fn test_root_says_hello() {
        let (status, body) = send("GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello World");
    }

    #[tokio::test]
    async fn test_auth_url_points_at_google() {
        let (status, body) = send("GET", "/auth/google").await;
        assert_eq!(status, StatusCode::OK);
        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=client-123"));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let (status, body) = send(
            "POST",
            "/resume/generate-with-ai?job_description=%20&language=en",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected() {
        let (status, _) = send(
            "POST",
            "/resume/generate-with-ai?job_description=Backend&language=fr",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_without_credentials_is_unauthorized() {
        let (status, body) = send(
            "POST",
            "/resume/generate-with-ai?job_description=Backend%20engineer",
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_document_without_credentials_is_unauthorized() {
        let (status, _) = send("POST", "/docs/create?title=Notes&user_id=nobody").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
