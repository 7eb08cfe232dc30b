//! Wikipedia — best-matching article, first few sentences of its summary.
//!
//! Two requests per query: an opensearch lookup for the top title, then the
//! REST page summary for that title. Disambiguation pages and missing
//! articles count as no answer.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use voxbot_config::WikipediaConfig;
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use super::{fetch_body, http_client, parse_json};

pub struct WikipediaSource {
    base_url: String,
    sentences: usize,
    client: reqwest::Client,
}

impl WikipediaSource {
    pub fn new(base_url: impl Into<String>, sentences: usize, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            sentences,
            client: http_client(timeout),
        }
    }

    pub fn from_config(config: &WikipediaConfig, timeout: Duration) -> Self {
        Self::new(&config.api_url, config.sentences, timeout)
    }

    async fn top_title(&self, query: &str) -> Result<Option<String>, SourceError> {
        let request = self.client.get(format!("{}/w/api.php", self.base_url)).query(&[
            ("action", "opensearch"),
            ("search", query),
            ("limit", "1"),
            ("namespace", "0"),
            ("format", "json"),
        ]);
        let body = fetch_body(request).await?;
        parse_search_titles(&body)
    }

    async fn summary(&self, title: &str) -> Result<SourceAnswer, SourceError> {
        let mut url = reqwest::Url::parse(&format!("{}/api/rest_v1/page/summary/", self.base_url))
            .map_err(|e| SourceError::NotConfigured(format!("invalid Wikipedia URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::NotConfigured("Wikipedia URL cannot take a path".into()))?
            .pop_if_empty()
            .push(&title.replace(' ', "_"));

        match fetch_body(self.client.get(url)).await {
            Ok(body) => parse_summary(&body, self.sentences),
            Err(SourceError::Status { status_code: 404, .. }) => Ok(SourceAnswer::NoAnswer),
            Err(e) => Err(e),
        }
    }
}

/// The first title from an opensearch response: `[query, [titles], [descriptions], [urls]]`.
pub fn parse_search_titles(body: &str) -> Result<Option<String>, SourceError> {
    let value: serde_json::Value = parse_json(body)?;
    let titles = value
        .get(1)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::Malformed("opensearch response has no title list".into()))?;
    Ok(titles.first().and_then(|t| t.as_str()).map(str::to_string))
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Extract text from a page summary, limited to `sentences` sentences.
pub fn parse_summary(body: &str, sentences: usize) -> Result<SourceAnswer, SourceError> {
    let page: PageSummary = parse_json(body)?;
    if page.kind == "disambiguation" {
        return Ok(SourceAnswer::NoAnswer);
    }
    Ok(SourceAnswer::from_option(Some(first_sentences(&page.extract, sentences))))
}

/// The first `n` sentences of `text`. A sentence ends at `.`, `!` or `?`
/// followed by whitespace or the end of the text.
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    if n == 0 {
        return String::new();
    }

    let mut count = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                count += 1;
                if count == n {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}

#[async_trait]
impl KnowledgeSource for WikipediaSource {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        let Some(title) = self.top_title(query).await? else {
            debug!(source = "wikipedia", "No matching article");
            return Ok(SourceAnswer::NoAnswer);
        };
        debug!(source = "wikipedia", %title, "Fetching summary");
        self.summary(&title).await
    }
}
