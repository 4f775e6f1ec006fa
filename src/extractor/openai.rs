//! OpenAI chat completion backend.
//!
//! Each task is a single `/chat/completions` request with a strict
//! `json_schema` response format. The returned message content is parsed
//! with serde into the target record.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::OpenAiConfig;
use crate::extractor::prompt::{
    bib_entry_prompt, bib_entry_schema, paper_info_prompt, paper_info_schema, summary_prompt,
    summary_schema,
};
use crate::extractor::{ExtractionError, PaperExtractor};
use crate::models::{BibEntry, PaperInfo, PaperSummary};
use crate::utils::build_client;

/// Extractor backed by an OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct OpenAiExtractor {
    client: Client,
    endpoint: Url,
    model: String,
    summary_chars: usize,
}

impl OpenAiExtractor {
    /// Create a new extractor. Fails when no API key is configured.
    pub fn new(config: &OpenAiConfig) -> Result<Self, ExtractionError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ExtractionError::Config(
                    "no API key configured; set OPENAI_API_KEY or add it to .env".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ExtractionError::Config(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = build_client(headers, Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            client,
            endpoint: completions_url(&config.base_url)?,
            model: config.model.clone(),
            summary_chars: config.summary_chars,
        })
    }

    /// Model used for every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check response for errors.
    async fn check_response(response: Response) -> Result<Response, ExtractionError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Try to parse as JSON error
        let message = serde_json::from_str::<Value>(&message)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or(message);

        Err(ExtractionError::Api { status, message })
    }

    /// Request a completion constrained to `schema` and parse it as `T`.
    async fn complete<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema_name: &'static str,
        schema: Value,
    ) -> Result<T, ExtractionError> {
        debug!("Requesting {} from model {}", schema_name, self.model);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "schema": schema,
                    "strict": true
                }
            }
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let raw = response.text().await?;
        let completion: ChatCompletionResponse =
            serde_json::from_str(&raw).map_err(|e| ExtractionError::Schema {
                schema: "chat_completion",
                message: e.to_string(),
            })?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(ExtractionError::EmptyResponse)?;

        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            return Err(ExtractionError::Refusal(refusal));
        }

        let content = message.content.ok_or(ExtractionError::EmptyResponse)?;
        parse_structured(&content, schema_name)
    }
}

#[async_trait]
impl PaperExtractor for OpenAiExtractor {
    async fn extract_paper_info(&self, text: &str) -> Result<PaperInfo, ExtractionError> {
        self.complete(paper_info_prompt(text), "paper_info", paper_info_schema())
            .await
    }

    async fn generate_bib_entry(&self, info: &PaperInfo) -> Result<BibEntry, ExtractionError> {
        self.complete(bib_entry_prompt(info), "bib_entry", bib_entry_schema())
            .await
    }

    async fn generate_summary(&self, text: &str) -> Result<String, ExtractionError> {
        let summary: PaperSummary = self
            .complete(
                summary_prompt(text, self.summary_chars),
                "paper_summary",
                summary_schema(),
            )
            .await?;
        Ok(summary.summary)
    }
}

fn completions_url(base_url: &str) -> Result<Url, ExtractionError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join("chat/completions"))
        .map_err(|e| ExtractionError::Config(format!("invalid base URL {}: {}", base_url, e)))
}

/// Parse a model reply into `T`, tolerating a markdown code fence around it.
fn parse_structured<T: DeserializeOwned>(
    content: &str,
    schema: &'static str,
) -> Result<T, ExtractionError> {
    let cleaned = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).map_err(|e| ExtractionError::Schema {
        schema,
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
