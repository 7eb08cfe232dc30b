//! News — latest headline from NewsAPI.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use voxbot_config::NewsConfig;
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use super::{fetch_body, http_client, mentions_any, parse_json};

/// Words that route a query to the news source.
pub const NEWS_KEYWORDS: &[&str] = &["news", "latest", "recent", "today", "current"];

pub struct NewsSource {
    api_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl NewsSource {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: http_client(timeout),
        }
    }

    pub fn from_config(config: &NewsConfig, timeout: Duration) -> Self {
        Self::new(&config.api_url, config.api_key.clone(), timeout)
    }
}

pub fn is_news_query(query: &str) -> bool {
    mentions_any(query, NEWS_KEYWORDS)
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// "Latest: <title> - <description>" for the newest article.
pub fn parse_headline(body: &str) -> Result<SourceAnswer, SourceError> {
    let response: NewsResponse = parse_json(body)?;
    let Some(article) = response.articles.into_iter().next() else {
        return Ok(SourceAnswer::NoAnswer);
    };
    let Some(title) = article.title.filter(|t| !t.trim().is_empty()) else {
        return Ok(SourceAnswer::NoAnswer);
    };
    Ok(SourceAnswer::Answer(match article.description {
        Some(d) if !d.trim().is_empty() => format!("Latest: {title} - {d}"),
        _ => format!("Latest: {title}"),
    }))
}

#[async_trait]
impl KnowledgeSource for NewsSource {
    fn name(&self) -> &str {
        "news"
    }

    async fn query(&self, query: &str) -> Result<SourceAnswer, SourceError> {
        if !is_news_query(query) {
            return Ok(SourceAnswer::NoAnswer);
        }
        let Some(api_key) = &self.api_key else {
            return Err(SourceError::NotConfigured("news API key not set".into()));
        };

        let request = self.client.get(&self.api_url).query(&[
            ("q", query),
            ("sortBy", "publishedAt"),
            ("pageSize", "3"),
            ("language", "en"),
            ("apiKey", api_key.as_str()),
        ]);
        let body = fetch_body(request).await?;
        parse_headline(&body)
    }
}
