//! Turn — one resolve-input → select-response → emit-reply cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::channel::ChannelId;

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyOrigin {
    /// A pattern rule matched (index in declaration order)
    Pattern { index: usize },

    /// An external knowledge source answered
    Source { name: String },

    /// Every configured source came back empty
    Apology,

    /// No rule matched and no source is configured
    DefaultPool,

    /// The help word was typed
    Help,

    /// The session is ending
    Farewell,
}

impl std::fmt::Display for ReplyOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern { index } => write!(f, "pattern#{index}"),
            Self::Source { name } => write!(f, "source:{name}"),
            Self::Apology => f.write_str("apology"),
            Self::DefaultPool => f.write_str("default_pool"),
            Self::Help => f.write_str("help"),
            Self::Farewell => f.write_str("farewell"),
        }
    }
}

/// A completed turn. Never persisted; discarded once the reply is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Correlation ID for logs
    pub id: Uuid,

    /// Raw input as resolved (trimmed)
    pub input: String,

    /// The channel the input came from
    pub channel: ChannelId,

    /// Which rule or source produced the reply
    pub origin: ReplyOrigin,

    /// The final reply text
    pub reply: String,

    /// When input resolution finished
    pub started_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        input: impl Into<String>,
        channel: ChannelId,
        origin: ReplyOrigin,
        reply: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: input.into(),
            channel,
            origin,
            reply: reply.into(),
            started_at: Utc::now(),
        }
    }
}
