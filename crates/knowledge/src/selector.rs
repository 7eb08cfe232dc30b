//! Response selector — turns one resolved input into exactly one reply.
//!
//! Pattern table first, then the source chain, then either the apology
//! (sources were configured but none answered) or the default pool (no
//! network sources at all). Selection never fails.

use std::sync::Arc;
use tracing::debug;
use voxbot_core::text::truncate_chars;
use voxbot_core::turn::ReplyOrigin;

use crate::chain::SourceChain;
use crate::patterns::PatternTable;
use crate::pool::DefaultReplyPool;

/// Default apology; `{query}` is replaced with the raw input.
pub const APOLOGY_TEMPLATE: &str = "I couldn't find specific information about '{query}' from available sources. \
     Try rephrasing your question or ask something more specific.";

/// Default cap on cleaned answer length.
pub const MAX_ANSWER_CHARS: usize = 1500;

/// The reply chosen for one turn and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub reply: String,
    pub origin: ReplyOrigin,
}

pub struct ResponseSelector {
    table: Option<Arc<PatternTable>>,
    chain: SourceChain,
    pool: DefaultReplyPool,
    apology_template: String,
    max_answer_chars: usize,
}

impl ResponseSelector {
    /// A selector with no table and no sources: every reply comes from the pool.
    pub fn new(pool: DefaultReplyPool) -> Self {
        Self {
            table: None,
            chain: SourceChain::new(10),
            pool,
            apology_template: APOLOGY_TEMPLATE.to_string(),
            max_answer_chars: MAX_ANSWER_CHARS,
        }
    }

    pub fn with_table(mut self, table: Arc<PatternTable>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_chain(mut self, chain: SourceChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_apology_template(mut self, template: impl Into<String>) -> Self {
        self.apology_template = template.into();
        self
    }

    pub fn with_max_answer_chars(mut self, max: usize) -> Self {
        self.max_answer_chars = max;
        self
    }

    pub fn chain(&self) -> &SourceChain {
        &self.chain
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Whether any source beyond the pattern table is configured.
    pub fn is_networked(&self) -> bool {
        self.chain.names().iter().any(|n| *n != "patterns")
    }

    /// The apology for an unanswered query.
    pub fn apology(&self, query: &str) -> String {
        self.apology_template.replace("{query}", query)
    }

    /// Choose the reply for `input`.
    pub async fn select(&self, input: &str) -> Selection {
        if let Some(table) = &self.table
            && let Some(m) = table.lookup(input)
        {
            debug!(rule = m.index, "Pattern matched");
            return Selection {
                reply: m.reply,
                origin: ReplyOrigin::Pattern { index: m.index },
            };
        }

        if let Some(answer) = self.chain.answer(input).await {
            return Selection {
                reply: truncate_chars(&answer.text, self.max_answer_chars),
                origin: ReplyOrigin::Source { name: answer.source },
            };
        }

        if self.is_networked() {
            debug!("No source answered");
            Selection {
                reply: self.apology(input),
                origin: ReplyOrigin::Apology,
            }
        } else {
            Selection {
                reply: self.pool.pick(),
                origin: ReplyOrigin::DefaultPool,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternRule;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use voxbot_core::error::SourceError;
    use voxbot_core::source::{KnowledgeSource, SourceAnswer};

    struct FixedSource {
        name: &'static str,
        answer: SourceAnswer,
        call_count: Mutex<usize>,
    }

    impl FixedSource {
        fn new(name: &'static str, answer: SourceAnswer) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                call_count: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl KnowledgeSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn query(&self, _query: &str) -> Result<SourceAnswer, SourceError> {
            *self.call_count.lock().unwrap() += 1;
            Ok(self.answer.clone())
        }
    }

    struct HangingSource;

    #[async_trait]
    impl KnowledgeSource for HangingSource {
        fn name(&self) -> &str {
            "slow"
        }

        async fn query(&self, _query: &str) -> Result<SourceAnswer, SourceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(SourceAnswer::NoAnswer)
        }
    }

    fn pool() -> DefaultReplyPool {
        DefaultReplyPool::with_seed(vec!["Interesting!".into(), "Tell me more.".into()], 1).unwrap()
    }

    fn table() -> Arc<PatternTable> {
        Arc::new(PatternTable::builtin("ChatBot"))
    }

    #[tokio::test]
    async fn pattern_beats_sources() {
        let source = FixedSource::new("wikipedia", SourceAnswer::Answer("A long encyclopedic answer".into()));
        let selector = ResponseSelector::new(pool())
            .with_table(table())
            .with_chain(SourceChain::new(10).add_default(source.clone()));

        let s = selector.select("Hello there").await;
        assert_eq!(s.origin, ReplyOrigin::Pattern { index: 0 });
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_chain_scenario() {
        let short = FixedSource::new("short", SourceAnswer::Answer("ten chars!".into()));
        let long = FixedSource::new("long", SourceAnswer::Answer("Paris[1] is the capital&nbsp;of  France.".into()));
        let chain = SourceChain::new(10)
            .add(Arc::new(HangingSource), Duration::from_millis(50))
            .add_default(short)
            .add_default(long);
        let selector = ResponseSelector::new(pool()).with_table(table()).with_chain(chain);

        let s = selector.select("capital of france").await;
        assert_eq!(s.origin, ReplyOrigin::Source { name: "long".into() });
        assert_eq!(s.reply, "Paris is the capital of France.");
    }

    #[tokio::test]
    async fn citation_noise_does_not_block_later_sources() {
        let noise = FixedSource::new("web_search", SourceAnswer::Answer("[1] [2] [3] [4]".into()));
        let wiki = FixedSource::new("wikipedia", SourceAnswer::Answer("Paris is the capital of France.".into()));
        let chain = SourceChain::new(10).add_default(noise).add_default(wiki.clone());
        let selector = ResponseSelector::new(pool()).with_table(table()).with_chain(chain);

        let s = selector.select("capital of france").await;
        assert_eq!(s.origin, ReplyOrigin::Source { name: "wikipedia".into() });
        assert_eq!(s.reply, "Paris is the capital of France.");
        assert_eq!(wiki.calls(), 1);
    }

    #[tokio::test]
    async fn exhausted_sources_apologise_verbatim() {
        let chain = SourceChain::new(10).add_default(FixedSource::new("wikipedia", SourceAnswer::NoAnswer));
        let selector = ResponseSelector::new(pool()).with_table(table()).with_chain(chain);

        let input = "Who Painted THE Zebra-Mural?";
        let s = selector.select(input).await;
        assert_eq!(s.origin, ReplyOrigin::Apology);
        assert!(s.reply.contains("'Who Painted THE Zebra-Mural?'"));
        assert!(s.reply.starts_with("I couldn't find specific information about"));
    }

    #[tokio::test]
    async fn no_sources_uses_pool() {
        let selector = ResponseSelector::new(pool()).with_table(table());
        for _ in 0..20 {
            let s = selector.select("purple monkey dishwasher").await;
            assert_eq!(s.origin, ReplyOrigin::DefaultPool);
            assert!(["Interesting!", "Tell me more."].contains(&s.reply.as_str()));
        }
    }

    #[tokio::test]
    async fn patterns_only_chain_is_offline() {
        let chain = SourceChain::new(10).add_default(table());
        let selector = ResponseSelector::new(pool()).with_chain(chain);
        assert!(!selector.is_networked());

        let s = selector.select("tell me a joke").await;
        assert_eq!(s.origin, ReplyOrigin::Source { name: "patterns".into() });

        let s = selector.select("purple monkey dishwasher").await;
        assert_eq!(s.origin, ReplyOrigin::DefaultPool);
    }

    #[tokio::test]
    async fn table_disabled_goes_straight_to_sources() {
        let source = FixedSource::new("web_search", SourceAnswer::Answer("Greetings from the web".into()));
        let selector = ResponseSelector::new(pool()).with_chain(SourceChain::new(10).add_default(source.clone()));

        let s = selector.select("hello").await;
        assert_eq!(s.origin, ReplyOrigin::Source { name: "web_search".into() });
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn answers_are_truncated() {
        let long = "word ".repeat(100);
        let chain = SourceChain::new(10).add_default(FixedSource::new("wikipedia", SourceAnswer::Answer(long)));
        let selector = ResponseSelector::new(pool()).with_chain(chain).with_max_answer_chars(100);

        let s = selector.select("anything").await;
        assert_eq!(s.reply.chars().count(), 103);
        assert!(s.reply.ends_with("..."));
    }

    #[tokio::test]
    async fn custom_rule_first() {
        let custom = PatternTable::new(vec![
            PatternRule::new(r"\bping\b", vec!["pong".into()]).unwrap(),
        ]);
        let selector = ResponseSelector::new(pool()).with_table(Arc::new(custom));
        let s = selector.select("PING").await;
        assert_eq!(s.reply, "pong");
    }

    #[test]
    fn apology_template_substitution() {
        let selector = ResponseSelector::new(pool()).with_apology_template("No idea about {query}.");
        assert_eq!(selector.apology("tides"), "No idea about tides.");
    }
}
