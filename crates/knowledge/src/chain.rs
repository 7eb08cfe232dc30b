//! Source chain — ordered fallback across knowledge sources.
//!
//! Each source is queried in turn under its own timeout. An error, a timeout,
//! an empty answer or an answer shorter than the minimum length all count as
//! "no answer" and the next source is tried. Length is measured after
//! cleaning. The first qualifying answer wins, already cleaned.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use voxbot_core::error::SourceError;
use voxbot_core::source::{KnowledgeSource, SourceAnswer};

use crate::clean::clean_text;

/// Default per-source timeout.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// An answer together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAnswer {
    pub source: String,
    pub text: String,
}

/// A single entry in the chain.
struct ChainEntry {
    source: Arc<dyn KnowledgeSource>,
    timeout: Duration,
}

/// Ordered list of knowledge sources with a minimum-answer threshold.
pub struct SourceChain {
    chain: Vec<ChainEntry>,
    min_answer_chars: usize,
}

impl SourceChain {
    /// Create an empty chain. Answers must exceed `min_answer_chars` characters.
    pub fn new(min_answer_chars: usize) -> Self {
        Self {
            chain: Vec::new(),
            min_answer_chars,
        }
    }

    /// Append a source with a custom timeout.
    pub fn add(mut self, source: Arc<dyn KnowledgeSource>, timeout: Duration) -> Self {
        self.chain.push(ChainEntry { source, timeout });
        self
    }

    /// Append a source with the default timeout (5s).
    pub fn add_default(self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.add(source, DEFAULT_SOURCE_TIMEOUT)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Source names in query order.
    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(|e| e.source.name()).collect()
    }

    pub fn min_answer_chars(&self) -> usize {
        self.min_answer_chars
    }

    fn qualifies(&self, cleaned: &str) -> bool {
        cleaned.chars().count() > self.min_answer_chars
    }

    /// Query sources in order; `None` when every source came back empty.
    pub async fn answer(&self, query: &str) -> Option<ChainAnswer> {
        for (i, entry) in self.chain.iter().enumerate() {
            let name = entry.source.name().to_string();

            debug!(
                source = %name,
                attempt = i + 1,
                total = self.chain.len(),
                "Querying source"
            );

            match tokio::time::timeout(entry.timeout, entry.source.query(query)).await {
                Ok(Ok(SourceAnswer::Answer(text))) => {
                    let text = clean_text(&text);
                    if self.qualifies(&text) {
                        info!(source = %name, "Source answered");
                        return Some(ChainAnswer { source: name, text });
                    }
                    debug!(source = %name, chars = text.chars().count(), "Answer too short, trying next");
                }
                Ok(Ok(SourceAnswer::NoAnswer)) => debug!(source = %name, "Source had no answer"),
                Ok(Err(SourceError::NotConfigured(reason))) => {
                    debug!(source = %name, %reason, "Source not configured, skipping");
                }
                Ok(Err(e)) => warn!(source = %name, error = %e, "Source failed, trying next"),
                Err(_) => {
                    let e = SourceError::Timeout {
                        source_name: name.clone(),
                        timeout: entry.timeout,
                    };
                    warn!(source = %name, error = %e, "Source timed out, trying next");
                }
            }
        }

        None
    }
}
