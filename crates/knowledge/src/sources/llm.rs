//! Hosted LLM — any OpenAI-compatible `/chat/completions` endpoint.
//!
//! Defaults to Groq. Without an API key the source reports itself as not
//! configured and the chain moves on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use voxbot_config::LlmConfig;
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use super::{http_client, parse_json};

pub struct LlmSource {
    base_url: String,
    api_key: Option<String>,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl LlmSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        let defaults = LlmConfig::default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            system_prompt: defaults.system_prompt,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            client: http_client(Duration::from_secs(defaults.timeout_secs)),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(Duration::from_secs(config.timeout_secs)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body<'a>(&'a self, query: &'a str) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ApiMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiReply,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    #[serde(default)]
    content: Option<String>,
}

/// The first choice's message content.
pub fn parse_completion(body: &str) -> Result<SourceAnswer, SourceError> {
    let response: ApiResponse = parse_json(body)?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Malformed("No choices in response".into()))?;
    Ok(SourceAnswer::from_option(choice.message.content))
}

#[async_trait]
impl KnowledgeSource for LlmSource {
    fn name(&self) -> &str {
        "llm"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        let Some(api_key) = &self.api_key else {
            return Err(SourceError::NotConfigured("LLM API key not set".into()));
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(source = "llm", model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(SourceError::NotConfigured(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if status != 200 {
            warn!(status, "LLM endpoint returned error");
            return Err(SourceError::Status {
                status_code: status,
                message: voxbot_core::text::truncate_chars(body.trim(), 200),
            });
        }

        parse_completion(&body)
    }
}
