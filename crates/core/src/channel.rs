//! Channel traits — the abstraction over input and output devices.
//!
//! An input channel produces one unit of user text per call (a recognized
//! utterance, a typed line). An output channel renders one reply (console
//! print, synthesized speech). Channels never decide what to say; they only
//! move text in and out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::ChannelError;

/// Unique identifier for a channel instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A source of user input.
///
/// `read` returns `Ok(None)` when the channel ran but produced nothing
/// (silence, blank line). Any `Err` is absorbed by the resolver and treated
/// as an empty result, except `Unavailable` (may demote the channel) and
/// `Closed` (ends the session).
#[async_trait]
pub trait InputChannel: Send + Sync {
    /// Human-readable channel name (e.g., "voice", "text").
    fn name(&self) -> &str;

    /// Unique ID for this channel instance.
    fn id(&self) -> &ChannelId;

    /// Obtain one unit of input.
    async fn read(&self) -> std::result::Result<Option<String>, ChannelError>;
}

/// A sink for replies.
///
/// Output is fire-and-forget from the session's point of view: errors are
/// logged and dropped by the caller.
#[async_trait]
pub trait OutputChannel: Send + Sync {
    fn name(&self) -> &str;

    /// Render one reply.
    async fn emit(&self, text: &str) -> std::result::Result<(), ChannelError>;
}

/// Parameters handed to a speech recognizer for one listening window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenParams {
    /// Ambient-noise calibration before listening starts
    pub calibration: Duration,

    /// Minimum audio energy considered speech
    pub energy_threshold: u32,

    /// How long to wait for speech to begin
    pub listen_timeout: Duration,

    /// Maximum length of a single phrase
    pub phrase_limit: Duration,
}

impl Default for ListenParams {
    fn default() -> Self {
        Self {
            calibration: Duration::from_secs(1),
            energy_threshold: 4000,
            listen_timeout: Duration::from_secs(10),
            phrase_limit: Duration::from_secs(10),
        }
    }
}

/// Parameters handed to a speech synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    /// Relative speaking rate, -10 (slowest) to 10 (fastest)
    pub rate: i32,

    /// Volume, 0 to 100
    pub volume: u32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self { rate: 1, volume: 100 }
    }
}

impl SpeechParams {
    /// The relative rate as words per minute, around a 175 wpm midpoint.
    pub fn words_per_minute(&self) -> u32 {
        (175 + self.rate.clamp(-10, 10) * 20).clamp(80, 450) as u32
    }
}
