//! Input resolver — ordered fallback across input channels.
//!
//! Channels are tried in priority order each turn. Whatever goes wrong
//! inside a channel (silence, unrecognized speech, service failure, timeout)
//! counts as an empty result and the next channel is tried. Only end of
//! input on a channel stops resolution outright.

use tracing::{debug, info, warn};
use voxbot_core::channel::{ChannelId, InputChannel};
use voxbot_core::error::ChannelError;

/// The outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A non-empty, trimmed line of input
    Input { text: String, channel: ChannelId },

    /// Every channel came back empty; skip this turn
    Empty,

    /// The operator closed the input stream
    Closed,
}

struct ResolverEntry {
    channel: Box<dyn InputChannel>,
    demoted: bool,
}

/// Tries input channels in order and returns the first non-empty result.
pub struct InputResolver {
    entries: Vec<ResolverEntry>,
    demote_unavailable: bool,
}

impl InputResolver {
    /// Create a resolver with no channels.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            demote_unavailable: true,
        }
    }

    /// Append a channel; earlier channels have priority.
    pub fn add(mut self, channel: Box<dyn InputChannel>) -> Self {
        self.entries.push(ResolverEntry {
            channel,
            demoted: false,
        });
        self
    }

    /// Whether a channel reporting `Unavailable` is skipped for the rest of the session.
    pub fn demote_unavailable(mut self, demote: bool) -> Self {
        self.demote_unavailable = demote;
        self
    }

    /// Names of channels still being tried, in priority order.
    pub fn active_channels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.demoted)
            .map(|e| e.channel.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Obtain one unit of input.
    pub async fn resolve(&mut self) -> Resolution {
        let demote_unavailable = self.demote_unavailable;

        for entry in self.entries.iter_mut().filter(|e| !e.demoted) {
            let name = entry.channel.name().to_string();

            match entry.channel.read().await {
                Ok(Some(text)) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        debug!(channel = %name, "Input resolved");
                        return Resolution::Input {
                            text: text.to_string(),
                            channel: entry.channel.id().clone(),
                        };
                    }
                    debug!(channel = %name, "Channel returned blank input");
                }
                Ok(None) => debug!(channel = %name, "Channel returned no input"),
                Err(ChannelError::Closed) => {
                    info!(channel = %name, "Input closed");
                    return Resolution::Closed;
                }
                Err(e) if e.is_unavailable() => {
                    warn!(channel = %name, error = %e, "Input channel unavailable, trying next");
                    if demote_unavailable {
                        info!(channel = %name, "Disabling channel for the rest of the session");
                        entry.demoted = true;
                    }
                }
                Err(e) => debug!(channel = %name, error = %e, "Input channel failed, trying next"),
            }
        }

        Resolution::Empty
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// A channel that replays scripted results and counts calls.
    struct ScriptedChannel {
        id: ChannelId,
        script: Mutex<Vec<Result<Option<String>, ChannelError>>>,
        calls: Arc<Mutex<usize>>,
    }

    impl ScriptedChannel {
        fn new(name: &str, script: Vec<Result<Option<String>, ChannelError>>) -> (Self, Arc<Mutex<usize>>) {
            let calls = Arc::new(Mutex::new(0));
            let mut script = script;
            script.reverse();
            (
                Self {
                    id: ChannelId(name.into()),
                    script: Mutex::new(script),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl InputChannel for ScriptedChannel {
        fn name(&self) -> &str {
            &self.id.0
        }
        fn id(&self) -> &ChannelId {
            &self.id
        }
        async fn read(&self) -> Result<Option<String>, ChannelError> {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().pop().unwrap_or(Ok(None))
        }
    }

    #[tokio::test]
    async fn first_channel_wins() {
        let (voice, _) = ScriptedChannel::new("voice", vec![Ok(Some("hello".into()))]);
        let (text, text_calls) = ScriptedChannel::new("text", vec![Ok(Some("typed".into()))]);
        let mut resolver = InputResolver::new().add(Box::new(voice)).add(Box::new(text));

        assert_eq!(
            resolver.resolve().await,
            Resolution::Input {
                text: "hello".into(),
                channel: ChannelId("voice".into())
            }
        );
        assert_eq!(*text_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn unrecognized_voice_falls_back_to_text() {
        let (voice, _) = ScriptedChannel::new("voice", vec![Err(ChannelError::Unrecognized)]);
        let (text, _) = ScriptedChannel::new("text", vec![Ok(Some("  what time is it ".into()))]);
        let mut resolver = InputResolver::new().add(Box::new(voice)).add(Box::new(text));

        assert_eq!(
            resolver.resolve().await,
            Resolution::Input {
                text: "what time is it".into(),
                channel: ChannelId("text".into())
            }
        );
    }

    #[tokio::test]
    async fn service_errors_and_timeouts_are_absorbed() {
        let (voice, _) = ScriptedChannel::new(
            "voice",
            vec![
                Err(ChannelError::Service {
                    channel: "voice".into(),
                    reason: "quota".into(),
                }),
                Err(ChannelError::Timeout {
                    channel: "voice".into(),
                    timeout_secs: 15,
                }),
            ],
        );
        let (text, _) = ScriptedChannel::new("text", vec![Ok(Some("a".into())), Ok(Some("b".into()))]);
        let mut resolver = InputResolver::new().add(Box::new(voice)).add(Box::new(text));

        assert!(matches!(resolver.resolve().await, Resolution::Input { text, .. } if text == "a"));
        assert!(matches!(resolver.resolve().await, Resolution::Input { text, .. } if text == "b"));
        assert_eq!(resolver.active_channels(), vec!["voice", "text"]);
    }

    #[tokio::test]
    async fn all_empty_is_empty() {
        let (voice, _) = ScriptedChannel::new("voice", vec![Ok(Some("   ".into()))]);
        let (text, _) = ScriptedChannel::new("text", vec![Ok(None)]);
        let mut resolver = InputResolver::new().add(Box::new(voice)).add(Box::new(text));
        assert_eq!(resolver.resolve().await, Resolution::Empty);
    }

    #[tokio::test]
    async fn unavailable_channel_is_demoted() {
        let (voice, voice_calls) = ScriptedChannel::new(
            "voice",
            vec![Err(ChannelError::Unavailable("no microphone".into()))],
        );
        let (text, _) = ScriptedChannel::new("text", vec![Ok(Some("one".into())), Ok(Some("two".into()))]);
        let mut resolver = InputResolver::new().add(Box::new(voice)).add(Box::new(text));

        assert!(matches!(resolver.resolve().await, Resolution::Input { text, .. } if text == "one"));
        assert_eq!(resolver.active_channels(), vec!["text"]);
        assert!(matches!(resolver.resolve().await, Resolution::Input { text, .. } if text == "two"));
        assert_eq!(*voice_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn demotion_can_be_disabled() {
        let (voice, voice_calls) = ScriptedChannel::new(
            "voice",
            vec![
                Err(ChannelError::Unavailable("no microphone".into())),
                Err(ChannelError::Unavailable("no microphone".into())),
            ],
        );
        let (text, _) = ScriptedChannel::new("text", vec![Ok(Some("one".into())), Ok(Some("two".into()))]);
        let mut resolver = InputResolver::new()
            .demote_unavailable(false)
            .add(Box::new(voice))
            .add(Box::new(text));

        resolver.resolve().await;
        resolver.resolve().await;
        assert_eq!(*voice_calls.lock().unwrap(), 2);
        assert_eq!(resolver.active_channels(), vec!["voice", "text"]);
    }

    #[tokio::test]
    async fn closed_stops_resolution() {
        let (text, _) = ScriptedChannel::new("text", vec![Err(ChannelError::Closed)]);
        let mut resolver = InputResolver::new().add(Box::new(text));
        assert_eq!(resolver.resolve().await, Resolution::Closed);
    }

    #[tokio::test]
    async fn no_channels_is_empty() {
        let mut resolver = InputResolver::new();
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve().await, Resolution::Empty);
    }
}
