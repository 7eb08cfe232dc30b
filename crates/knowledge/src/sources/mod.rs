//! Network-backed knowledge sources.
//!
//! Every source is a thin HTTP client plus a pure parsing function, so the
//! response handling can be tested without a network. Timeouts are enforced
//! by the chain, not here.

pub mod llm;
pub mod news;
pub mod weather;
pub mod web_search;
pub mod wikipedia;

pub use llm::LlmSource;
pub use news::NewsSource;
pub use weather::WeatherSource;
pub use web_search::WebSearchSource;
pub use wikipedia::WikipediaSource;

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;
use voxbot_core::error::SourceError;

const USER_AGENT: &str = concat!("voxbot/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client builder. The client-level timeout is a backstop; the
/// chain's per-source timeout normally fires first.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Send a request and return the body of a 200 response.
pub(crate) async fn fetch_body(request: reqwest::RequestBuilder) -> Result<String, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    if status != 200 {
        return Err(SourceError::Status {
            status_code: status,
            message: truncate_body(&body),
        });
    }

    Ok(body)
}

/// Deserialize a JSON body.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))
}

fn truncate_body(body: &str) -> String {
    voxbot_core::text::truncate_chars(body.trim(), 200)
}

/// Whether any of `keywords` appears as a whole word in `query`.
pub(crate) fn mentions_any(query: &str, keywords: &[&str]) -> bool {
    words(query).any(|w| keywords.contains(&w.as_str()))
}

/// Lower-cased words with surrounding punctuation removed.
pub(crate) fn words(query: &str) -> impl Iterator<Item = String> + '_ {
    query
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}
