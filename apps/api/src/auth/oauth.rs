//! Google OAuth2 authorization-code flow.
//!
//! Produces the consent URL and exchanges the returned code for tokens. Tokens
//! are not refreshed; an expired token surfaces as a remote API failure.

use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::credentials::StoredCredentials;
use crate::errors::AppError;

const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/documents",
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(
        client: Client,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Consent-screen URL requesting offline access to Docs, Sheets and Drive.
    pub fn authorization_url(&self) -> Result<String, AppError> {
        let state = Uuid::new_v4().to_string();
        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            AUTH_URI,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid authorization URL: {e}")))?;
        Ok(url.into())
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<StoredCredentials, AppError> {
        let response = self
            .client
            .post(TOKEN_URI)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {desc}", e.error),
                    None => e.error,
                })
                .unwrap_or(body);
            return Err(AppError::Validation(format!(
                "Failed to get credentials: {message}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid token response: {e}")))?;

        info!("Exchanged authorization code for tokens");
        Ok(self.to_credentials(token))
    }

    fn to_credentials(&self, token: TokenResponse) -> StoredCredentials {
        let scopes = match token.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        StoredCredentials {
            token: token.access_token,
            refresh_token: token.refresh_token,
            token_uri: TOKEN_URI.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scopes,
            expiry: token
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> OAuthClient {
        OAuthClient::new(
            Client::new(),
            "client-123".to_string(),
            "secret".to_string(),
            "http://localhost:8002/auth/google/callback".to_string(),
        )
    }

    #[test]
    fn test_authorization_url_requests_offline_access() {
        let url = Url::parse(&oauth().authorization_url().unwrap()).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with(AUTH_URI));
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["include_granted_scopes"], "true");
        assert_eq!(params["response_type"], "code");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:8002/auth/google/callback"
        );
        assert!(params["scope"].contains("https://www.googleapis.com/auth/drive"));
        assert!(Uuid::parse_str(&params["state"]).is_ok());
    }

    #[test]
    fn test_token_response_maps_to_credentials() {
        let token: TokenResponse = serde_json::from_str(
            r#"{
                "access_token": "ya29.a",
                "refresh_token": "1//r",
                "expires_in": 3599,
                "scope": "https://www.googleapis.com/auth/documents https://www.googleapis.com/auth/drive",
                "token_type": "Bearer"
            }"#,
        )
        .unwrap();

        let creds = oauth().to_credentials(token);
        assert_eq!(creds.token, "ya29.a");
        assert_eq!(creds.refresh_token.as_deref(), Some("1//r"));
        assert_eq!(creds.token_uri, TOKEN_URI);
        assert_eq!(creds.scopes.len(), 2);
        assert!(creds.expiry.unwrap() > Utc::now());
    }

    #[test]
    fn test_out_of_range_expiry_is_dropped() {
        let token = TokenResponse {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_in: Some(i64::MAX),
            scope: None,
        };
        assert!(oauth().to_credentials(token).expiry.is_none());
    }

    #[test]
    fn test_missing_scope_falls_back_to_requested_scopes() {
        let token = TokenResponse {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_in: None,
            scope: None,
        };
        let creds = oauth().to_credentials(token);
        assert_eq!(creds.scopes.len(), SCOPES.len());
        assert!(creds.expiry.is_none());
    }
}
