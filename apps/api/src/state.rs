use std::sync::Arc;

use reqwest::Client;

use crate::auth::{CredentialProvider, OAuthClient};
use crate::config::Config;
use crate::docs::TemplateIds;
use crate::llm_client::ContentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shared HTTP client; per-user Docs clients are built on top of it.
    pub http: Client,
    pub llm: Arc<dyn ContentGenerator>,
    /// Pluggable credential source. Default: FileCredentialProvider under CREDENTIALS_DIR.
    pub credentials: Arc<dyn CredentialProvider>,
    pub oauth: OAuthClient,
    pub templates: TemplateIds,
}
