//! Voxbot knowledge — how a reply is chosen.
//!
//! - **Pattern table** — ordered regex rules, first match wins
//! - **Sources** — web search, Wikipedia, weather, news, hosted LLM
//! - **Source chain** — ordered fallback with per-source timeouts
//! - **Default pool** — random generic reply when nothing is configured
//! - **Selector** — composes the above into one total `select()`

pub mod chain;
pub mod clean;
pub mod patterns;
pub mod pool;
pub mod selector;
pub mod sources;

pub use chain::{ChainAnswer, SourceChain};
pub use clean::clean_text;
pub use patterns::{PatternMatch, PatternRule, PatternTable};
pub use pool::DefaultReplyPool;
pub use selector::{ResponseSelector, Selection};

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use voxbot_config::AppConfig;
use voxbot_core::error::{Error, Result};
use voxbot_core::source::KnowledgeSource;

use sources::{LlmSource, NewsSource, WeatherSource, WebSearchSource, WikipediaSource};

/// Build one named source. `table` backs the `"patterns"` entry.
pub fn source_from_config(
    name: &str,
    config: &AppConfig,
    table: &Arc<PatternTable>,
) -> Result<(Arc<dyn KnowledgeSource>, Duration)> {
    let sources = &config.sources;
    let timeout = Duration::from_secs(sources.timeout_secs);

    let built: (Arc<dyn KnowledgeSource>, Duration) = match name {
        "patterns" => (table.clone(), timeout),
        "web_search" => (Arc::new(WebSearchSource::from_config(&sources.web_search, timeout)), timeout),
        "wikipedia" => (Arc::new(WikipediaSource::from_config(&sources.wikipedia, timeout)), timeout),
        "weather" => (Arc::new(WeatherSource::from_config(&sources.weather, timeout)), timeout),
        "news" => (Arc::new(NewsSource::from_config(&sources.news, timeout)), timeout),
        "llm" => (
            Arc::new(LlmSource::from_config(&sources.llm)),
            Duration::from_secs(sources.llm.timeout_secs),
        ),
        other => {
            return Err(Error::Config {
                message: format!("unknown knowledge source '{other}'"),
            });
        }
    };
    Ok(built)
}

/// Build the source chain in configured order.
pub fn chain_from_config(config: &AppConfig, table: &Arc<PatternTable>) -> Result<SourceChain> {
    let mut chain = SourceChain::new(config.selector.min_answer_chars);
    for name in &config.sources.order {
        let (source, timeout) = source_from_config(name, config, table)?;
        debug!(source = %name, timeout_ms = timeout.as_millis() as u64, "Registered source");
        chain = chain.add(source, timeout);
    }
    Ok(chain)
}

/// Build the full selector. `seed` fixes the default pool's RNG.
pub fn selector_from_config(config: &AppConfig, seed: Option<u64>) -> Result<ResponseSelector> {
    let table = Arc::new(PatternTable::with_overrides(&config.bot_name, &config.patterns)?);
    let chain = chain_from_config(config, &table)?;

    let replies = config.selector.default_replies.clone();
    let pool = match seed {
        Some(seed) => DefaultReplyPool::with_seed(replies, seed)?,
        None => DefaultReplyPool::new(replies)?,
    };

    let mut selector = ResponseSelector::new(pool)
        .with_chain(chain)
        .with_apology_template(&config.selector.apology_template)
        .with_max_answer_chars(config.selector.max_answer_chars);

    if config.selector.use_pattern_table {
        selector = selector.with_table(table);
    }

    Ok(selector)
}
