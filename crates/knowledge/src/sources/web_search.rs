//! Web search — DuckDuckGo instant answers.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use voxbot_config::WebSearchConfig;
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use super::{fetch_body, http_client, parse_json};

pub struct WebSearchSource {
    api_url: String,
    client: reqwest::Client,
}

impl WebSearchSource {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            client: http_client(timeout),
        }
    }

    pub fn from_config(config: &WebSearchConfig, timeout: Duration) -> Self {
        Self::new(&config.api_url, timeout)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    abstract_text: String,
    #[serde(default)]
    answer: serde_json::Value,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelatedTopic {
    #[serde(default)]
    text: Option<String>,
}

/// Abstract first, then the direct answer, then the first related topic.
pub fn parse_instant_answer(body: &str) -> Result<SourceAnswer, SourceError> {
    let parsed: InstantAnswer = parse_json(body)?;

    // "Answer" is usually a string but some instant answers return an object.
    let answer = parsed.answer.as_str().map(str::to_string);
    let related = parsed.related_topics.into_iter().next().and_then(|t| t.text);

    let text = [Some(parsed.abstract_text), answer, related]
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty());

    Ok(SourceAnswer::from_option(text))
}

#[async_trait]
impl KnowledgeSource for WebSearchSource {
    fn name(&self) -> &str {
        "web_search"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        debug!(source = "web_search", "Sending instant-answer request");
        let request = self.client.get(&self.api_url).query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);
        let body = fetch_body(request).await?;
        parse_instant_answer(&body)
    }
}
