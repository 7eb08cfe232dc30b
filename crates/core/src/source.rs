//! KnowledgeSource trait — the abstraction over answer providers.
//!
//! A knowledge source turns a free-text query into an answer: a static
//! pattern table, Wikipedia, a weather API, a news API, a web search, or a
//! hosted LLM. Sources are tried in a fixed priority order by the response
//! selector; none of them keep state between turns.

use async_trait::async_trait;
use crate::error::SourceError;

/// The outcome of a successful query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAnswer {
    /// The source produced an answer.
    Answer(String),

    /// The source ran and had nothing to say (no match, topic not handled).
    NoAnswer,
}

impl SourceAnswer {
    /// The answer text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Answer(text) => Some(text),
            Self::NoAnswer => None,
        }
    }

    /// Build an answer from an optional string, treating blank text as no answer.
    pub fn from_option(text: Option<String>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Self::Answer(t),
            _ => Self::NoAnswer,
        }
    }
}

/// The core KnowledgeSource trait.
///
/// Implementations must not retry internally; the chain that owns them
/// enforces a per-source timeout and moves on.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// The unique name of this source (e.g., "wikipedia", "weather").
    fn name(&self) -> &str;

    /// Answer a free-text query.
    async fn query(&self, query: &str) -> std::result::Result<SourceAnswer, SourceError>;
}
