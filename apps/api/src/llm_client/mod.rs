/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Every generation stage goes through `generate_structured`, which constrains
/// the model to a response schema and validates what comes back.
///
/// Model: gemini-2.0-flash (hardcoded)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::TailorError;
use crate::generation::schema::{ResponseSchema, Stage};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all generation calls.
pub const MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A generative service that can be constrained to a named response schema.
///
/// Returns the raw JSON text; parsing and validation happen in
/// `generate_structured` so every backend is held to the same shape checks.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_json(
        &self,
        schema_name: &str,
        schema: &Value,
        prompt: &str,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Extracts the text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleApiError {
    error: GoogleApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorBody {
    message: String,
}

/// The Gemini client used by all generation stages.
/// Single attempt per call: a failed call fails its stage.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Makes a raw schema-constrained call, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = build_request(prompt, schema);

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(gemini_response)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_json(
        &self,
        schema_name: &str,
        schema: &Value,
        prompt: &str,
    ) -> Result<String, LlmError> {
        debug!("Requesting {schema_name} from {MODEL}");
        let response = self.call(prompt, schema).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn build_request<'a>(prompt: &'a str, schema: &'a Value) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        },
    }
}

/// Runs one schema-constrained generation for `stage`.
///
/// Transport failures become `GenerationFailure`; output that does not parse
/// into `T` or fails `T::validate` becomes `SchemaMismatch` carrying the raw text.
pub async fn generate_structured<T: ResponseSchema>(
    llm: &dyn ContentGenerator,
    stage: Stage,
    prompt: &str,
) -> Result<T, TailorError> {
    let raw = llm
        .generate_json(T::NAME, &T::schema(), prompt)
        .await
        .map_err(|e| TailorError::GenerationFailure {
            stage,
            cause: e.to_string(),
        })?;

    let parsed: T =
        serde_json::from_str(strip_json_fences(&raw)).map_err(|e| TailorError::SchemaMismatch {
            stage,
            reason: e.to_string(),
            raw: raw.clone(),
        })?;

    parsed
        .validate()
        .map_err(|reason| TailorError::SchemaMismatch {
            stage,
            reason,
            raw: raw.clone(),
        })?;

    Ok(parsed)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Answers each schema name with a canned payload and records what was asked.
    #[derive(Default)]
    pub struct StubGenerator {
        responses: HashMap<String, Result<String, u16>>,
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl StubGenerator {
        pub fn with_response(mut self, schema_name: &str, body: impl Into<String>) -> Self {
            self.responses
                .insert(schema_name.to_string(), Ok(body.into()));
            self
        }

        pub fn with_failure(mut self, schema_name: &str, status: u16) -> Self {
            self.responses.insert(schema_name.to_string(), Err(status));
            self
        }

        pub fn prompt_for(&self, schema_name: &str) -> Option<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|(name, _)| name == schema_name)
                .map(|(_, prompt)| prompt.clone())
        }
    }

    #[async_trait]
    impl ContentGenerator for StubGenerator {
        async fn generate_json(
            &self,
            schema_name: &str,
            _schema: &Value,
            prompt: &str,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((schema_name.to_string(), prompt.to_string()));
            match self.responses.get(schema_name) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(LlmError::Api {
                    status: *status,
                    message: "stubbed failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubGenerator;
    use super::*;
    use crate::generation::schema::{ProfessionalSummary, ProjectsSection};

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_request_carries_schema_and_json_mime_type() {
        let schema = ProfessionalSummary::schema();
        let body = serde_json::to_value(build_request("Write a summary", &schema)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Write a summary");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_response_text_from_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"summary\": \"Hi\"}"}], "role": "model"}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"summary\": \"Hi\"}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_generate_structured_parses_valid_payload() {
        let llm = StubGenerator::default()
            .with_response("ProfessionalSummary", r#"{"summary": "Backend engineer."}"#);

        let summary: ProfessionalSummary = generate_structured(&llm, Stage::Summary, "prompt")
            .await
            .unwrap();
        assert_eq!(summary.summary, "Backend engineer.");
    }

    #[tokio::test]
    async fn test_generate_structured_transport_error_is_generation_failure() {
        let llm = StubGenerator::default().with_failure("ProfessionalSummary", 429);

        let err = generate_structured::<ProfessionalSummary>(&llm, Stage::Summary, "prompt")
            .await
            .unwrap_err();
        match err {
            TailorError::GenerationFailure { stage, cause } => {
                assert_eq!(stage, Stage::Summary);
                assert!(cause.contains("429"));
            }
            other => panic!("expected GenerationFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_structured_wrong_shape_is_schema_mismatch() {
        let llm = StubGenerator::default()
            .with_response("ProfessionalSummary", r#"{"text": "wrong field"}"#);

        let err = generate_structured::<ProfessionalSummary>(&llm, Stage::Summary, "prompt")
            .await
            .unwrap_err();
        match err {
            TailorError::SchemaMismatch { stage, raw, .. } => {
                assert_eq!(stage, Stage::Summary);
                assert_eq!(raw, r#"{"text": "wrong field"}"#);
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_structured_failed_validation_is_schema_mismatch() {
        let payload = r#"{"projects": [{
            "name": "Solo", "url": "u", "date": "d", "tech_stack": [],
            "formatted_bullets": ["only one"]
        }]}"#;
        let llm = StubGenerator::default().with_response("ProjectsSection", payload);

        let err = generate_structured::<ProjectsSection>(&llm, Stage::Projects, "prompt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TailorError::SchemaMismatch { stage: Stage::Projects, .. }
        ));
    }
}
