//! Credential storage: persisted OAuth tokens, one JSON file per user.
//!
//! The tailoring core never reads these files; it receives a bearer token from
//! a `CredentialProvider` injected through `AppState`.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;

/// OAuth credentials as saved after the authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Supplies and stores bearer credentials for a user.
///
/// Implementations must return `AppError::Unauthorized` when nothing is stored
/// for the user.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self, user_id: &str) -> Result<String, AppError>;

    /// Persists freshly exchanged credentials for `user_id`.
    async fn save(&self, user_id: &str, credentials: &StoredCredentials) -> Result<(), AppError>;
}

/// Reads and writes `<dir>/<user_id>.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    dir: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user id must be a single plain file name so the path stays inside `dir`.
    fn path_for(&self, user_id: &str) -> Result<PathBuf, AppError> {
        let mut components = Path::new(user_id).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name || user_id.contains(['/', '\\']) || user_id.contains("..") {
            return Err(AppError::Validation(format!("Invalid user id '{user_id}'")));
        }
        Ok(self.dir.join(format!("{user_id}.json")))
    }

    pub async fn load(&self, user_id: &str) -> Result<StoredCredentials, AppError> {
        let path = self.path_for(user_id)?;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored credentials for {user_id}");
                return Err(AppError::Unauthorized);
            }
            Err(e) => {
                return Err(AppError::Internal(
                    anyhow::Error::new(e).context("Failed to read credentials file"),
                ))
            }
        };

        let credentials = serde_json::from_slice(&bytes).context("Failed to load credentials")?;
        Ok(credentials)
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn access_token(&self, user_id: &str) -> Result<String, AppError> {
        Ok(self.load(user_id).await?.token)
    }

    async fn save(&self, user_id: &str, credentials: &StoredCredentials) -> Result<(), AppError> {
        let path = self.path_for(user_id)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let json = serde_json::to_vec_pretty(credentials)
            .context("Failed to serialize credentials")?;
        tokio::fs::write(path, json)
            .await
            .context("Failed to write credentials file")?;

        info!("Saved credentials for {user_id}");
        Ok(())
    }
}
