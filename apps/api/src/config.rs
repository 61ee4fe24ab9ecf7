use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::docs::template::TemplateIds;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub template_id: String,
    pub korean_template_id: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    /// Single-user deployment: credentials are stored and looked up under this id.
    pub test_user_email: String,
    pub resume_data_path: PathBuf,
    pub credentials_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            template_id: require_env("TEMPLATE_ID")?,
            korean_template_id: require_env("KOREAN_TEMPLATE_ID")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            google_client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
            google_redirect_uri: require_env("GOOGLE_REDIRECT_URI")?,
            test_user_email: require_env("TEST_USER_EMAIL")?,
            resume_data_path: std::env::var("RESUME_DATA_PATH")
                .unwrap_or_else(|_| "config/resume_data.toml".to_string())
                .into(),
            credentials_dir: std::env::var("CREDENTIALS_DIR")
                .unwrap_or_else(|_| "credentials".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8002".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn template_ids(&self) -> TemplateIds {
        TemplateIds {
            english: self.template_id.clone(),
            korean: self.korean_template_id.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
