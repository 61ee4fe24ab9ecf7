//! Google Docs / Drive client: the document store behind template copy and
//! batch substitution.
//!
//! ARCHITECTURAL RULE: assembly code talks to `DocumentStore`, never to
//! `GoogleDocsClient` directly, so the deterministic operation list stays
//! testable without a network.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::docs::assembly::SubstitutionOperation;

const DOCS_API_BASE: &str = "https://docs.googleapis.com/v1/documents";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response missing field '{0}'")]
    MissingField(&'static str),
}

/// Remote document store: copy a file, then mutate it in one batch.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Copies `file_id` into a new file named `title`, returning the new id.
    async fn copy_file(&self, file_id: &str, title: &str) -> Result<String, DocsError>;

    /// Applies every substitution to `document_id` in a single batch request.
    async fn batch_replace(
        &self,
        document_id: &str,
        operations: &[SubstitutionOperation],
    ) -> Result<(), DocsError>;
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    requests: Vec<DocsRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum DocsRequest<'a> {
    ReplaceAllText(ReplaceAllText<'a>),
    InsertText(InsertText<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceAllText<'a> {
    contains_text: SubstringMatch<'a>,
    replace_text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubstringMatch<'a> {
    text: &'a str,
    match_case: bool,
}

#[derive(Debug, Serialize)]
struct InsertText<'a> {
    location: Location,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Location {
    index: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
    error: GoogleApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorBody {
    message: String,
}

fn replace_requests(operations: &[SubstitutionOperation]) -> BatchUpdateRequest<'_> {
    BatchUpdateRequest {
        requests: operations
            .iter()
            .map(|op| {
                DocsRequest::ReplaceAllText(ReplaceAllText {
                    contains_text: SubstringMatch {
                        text: &op.marker,
                        match_case: true,
                    },
                    replace_text: &op.replacement,
                })
            })
            .collect(),
    }
}

/// Authenticated Docs + Drive client for one user's bearer token.
#[derive(Clone)]
pub struct GoogleDocsClient {
    client: Client,
    access_token: String,
}

impl GoogleDocsClient {
    pub fn new(client: Client, access_token: String) -> Self {
        Self {
            client,
            access_token,
        }
    }

    /// Fetches the full document resource as JSON.
    pub async fn get_document(&self, document_id: &str) -> Result<Value, DocsError> {
        self.send(self.client.get(format!("{DOCS_API_BASE}/{document_id}")))
            .await
    }

    /// Creates a blank document and returns its id.
    pub async fn create_document(&self, title: &str) -> Result<String, DocsError> {
        let document = self
            .send(
                self.client
                    .post(DOCS_API_BASE)
                    .json(&json!({ "title": title })),
            )
            .await?;
        string_field(&document, "documentId")
    }

    /// Inserts `text` at the start of the document body.
    pub async fn insert_text(&self, document_id: &str, text: &str) -> Result<(), DocsError> {
        let body = BatchUpdateRequest {
            requests: vec![DocsRequest::InsertText(InsertText {
                location: Location { index: 1 },
                text,
            })],
        };
        self.send(
            self.client
                .post(format!("{DOCS_API_BASE}/{document_id}:batchUpdate"))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// Sends an authenticated request and decodes the JSON body, mapping
    /// non-2xx responses to `DocsError::Api` with Google's error message.
    async fn send(&self, request: RequestBuilder) -> Result<Value, DocsError> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(DocsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentStore for GoogleDocsClient {
    async fn copy_file(&self, file_id: &str, title: &str) -> Result<String, DocsError> {
        let copied = self
            .send(
                self.client
                    .post(format!("{DRIVE_API_BASE}/{file_id}/copy"))
                    .json(&json!({ "name": title })),
            )
            .await?;
        let id = string_field(&copied, "id")?;
        debug!("Copied file {file_id} to {id}");
        Ok(id)
    }

    async fn batch_replace(
        &self,
        document_id: &str,
        operations: &[SubstitutionOperation],
    ) -> Result<(), DocsError> {
        self.send(
            self.client
                .post(format!("{DOCS_API_BASE}/{document_id}:batchUpdate"))
                .json(&replace_requests(operations)),
        )
        .await?;
        debug!(
            "Applied {} replacements to document {document_id}",
            operations.len()
        );
        Ok(())
    }
}

fn string_field(value: &Value, field: &'static str) -> Result<String, DocsError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DocsError::MissingField(field))
}
