//! End-to-end integration tests for the Voxbot pipeline.
//!
//! These tests drive full sessions from raw input to emitted replies,
//! through real text channels, the configured selector and mock knowledge
//! sources.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use voxbot_agent::{EndReason, Session};
use voxbot_channels::{InputResolver, TextChannel};
use voxbot_config::{AppConfig, SessionConfig};
use voxbot_core::channel::{ChannelId, OutputChannel};
use voxbot_core::error::{ChannelError, SourceError};
use voxbot_core::source::{KnowledgeSource, SourceAnswer};
use voxbot_core::turn::ReplyOrigin;
use voxbot_knowledge::{DefaultReplyPool, PatternTable, ResponseSelector, SourceChain};

// ── Test doubles ─────────────────────────────────────────────────────────

/// Records every emitted reply.
#[derive(Clone, Default)]
struct RecordingOutput(Arc<Mutex<Vec<String>>>);

impl RecordingOutput {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl OutputChannel for RecordingOutput {
    fn name(&self) -> &str {
        "recording"
    }

    async fn emit(&self, text: &str) -> Result<(), ChannelError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A knowledge source with a fixed answer and a call counter.
struct MockSource {
    name: &'static str,
    answer: Result<SourceAnswer, SourceError>,
    calls: Mutex<usize>,
}

impl MockSource {
    fn answering(name: &'static str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Ok(SourceAnswer::Answer(text.into())),
            calls: Mutex::new(0),
        })
    }

    fn failing(name: &'static str, error: SourceError) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Err(error),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for MockSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn query(&self, _query: &str) -> Result<SourceAnswer, SourceError> {
        *self.calls.lock().unwrap() += 1;
        self.answer.clone()
    }
}

/// A source that never answers.
struct StalledSource;

#[async_trait::async_trait]
impl KnowledgeSource for StalledSource {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn query(&self, _query: &str) -> Result<SourceAnswer, SourceError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(SourceAnswer::NoAnswer)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn typed(input: &'static str) -> InputResolver {
    InputResolver::new().add(Box::new(TextChannel::from_reader(input.as_bytes(), "")))
}

fn pool() -> DefaultReplyPool {
    DefaultReplyPool::with_seed(AppConfig::default().selector.default_replies, 11).unwrap()
}

fn table() -> Arc<PatternTable> {
    Arc::new(PatternTable::builtin("ChatBot"))
}

async fn run(resolver: InputResolver, selector: ResponseSelector) -> (voxbot_agent::SessionSummary, Vec<String>) {
    let output = RecordingOutput::default();
    let session = Session::new(
        resolver,
        Arc::new(selector),
        vec![Box::new(output.clone())],
        SessionConfig::default(),
    )
    .unwrap();
    let summary = session.run_until(std::future::pending()).await;
    (summary, output.lines())
}

// ── Conversations ────────────────────────────────────────────────────────

#[tokio::test]
async fn offline_conversation_end_to_end() {
    let selector = ResponseSelector::new(pool()).with_table(table());
    let (summary, lines) = run(
        typed("Hello\nwhat's the date\nhelp\nwhere do penguins live\n\nok bye now\n"),
        selector,
    )
    .await;

    let session = SessionConfig::default();
    assert_eq!(summary.reason, EndReason::ExitPhrase);
    // the blank line is skipped without a turn
    assert_eq!(summary.turn_count(), 5);

    assert_eq!(lines.first(), Some(&session.greeting));
    assert_eq!(lines[1], "Hello! How can I help you today?");
    assert!(lines[2].starts_with("Today's date is "));
    assert_eq!(lines[3], session.help_text);
    assert!(AppConfig::default().selector.default_replies.contains(&lines[4]));
    assert_eq!(lines.last(), Some(&session.farewell));

    let last = summary.last_turn.unwrap();
    assert_eq!(last.origin, ReplyOrigin::Farewell);
    assert_eq!(last.channel, ChannelId("text".into()));
}

#[tokio::test]
async fn end_of_input_ends_with_interrupt_farewell() {
    let selector = ResponseSelector::new(pool()).with_table(table());
    let (summary, lines) = run(typed("tell me a joke\n"), selector).await;

    assert_eq!(summary.reason, EndReason::InputClosed);
    assert_eq!(summary.turn_count(), 1);
    assert_eq!(lines.last().map(String::as_str), Some("Goodbye! See you soon!"));
}

#[tokio::test]
async fn sources_answer_unmatched_questions() {
    let stalled: Arc<dyn KnowledgeSource> = Arc::new(StalledSource);
    let short = MockSource::answering("web_search", "Yes.");
    let wiki = MockSource::answering(
        "wikipedia",
        "The emperor penguin[2] lives in   Antarctica &amp; nearby seas.",
    );
    let chain = SourceChain::new(10)
        .add(stalled, Duration::from_millis(50))
        .add_default(short.clone())
        .add_default(wiki.clone());
    let selector = ResponseSelector::new(pool()).with_table(table()).with_chain(chain);

    let (summary, lines) = run(typed("where do penguins live\nhi\nquit\n"), selector).await;

    assert_eq!(summary.turn_count(), 3);
    assert_eq!(lines[1], "The emperor penguin lives in Antarctica & nearby seas.");
    // "hi" is answered by the table without touching the sources
    assert_eq!(lines[2], "Hello! How can I help you today?");
    assert_eq!(short.calls(), 1);
    assert_eq!(wiki.calls(), 1);
}

#[tokio::test]
async fn exhausted_sources_apologise_with_the_question() {
    let chain = SourceChain::new(10)
        .add_default(MockSource::failing("news", SourceError::NotConfigured("no key".into())))
        .add_default(MockSource::failing("wikipedia", SourceError::Transport("offline".into())));
    let selector = ResponseSelector::new(pool()).with_table(table()).with_chain(chain);

    let (summary, lines) = run(typed("Who built Stonehenge?\nbye\n"), selector).await;

    assert_eq!(summary.reason, EndReason::ExitPhrase);
    assert_eq!(
        lines[1],
        "I couldn't find specific information about 'Who built Stonehenge?' from available sources. \
         Try rephrasing your question or ask something more specific."
    );
}

#[cfg(unix)]
#[tokio::test]
async fn voice_failure_falls_back_to_keyboard() {
    use voxbot_channels::VoiceChannel;
    use voxbot_core::channel::ListenParams;

    // A recognizer that hears nothing, then one that transcribes.
    let deaf = VoiceChannel::new("sh", vec!["-c".into(), "exit 0".into()], ListenParams::default());
    let resolver = InputResolver::new()
        .add(Box::new(deaf))
        .add(Box::new(TextChannel::from_reader("what time is it\ngoodbye\n".as_bytes(), "")));
    let selector = ResponseSelector::new(pool()).with_table(table());

    let (summary, lines) = run(resolver, selector).await;
    assert_eq!(summary.last_turn.unwrap().channel, ChannelId("text".into()));
    assert!(lines[1].starts_with("The current time is "));
    assert_eq!(summary.reason, EndReason::ExitPhrase);
}

#[cfg(unix)]
#[tokio::test]
async fn voice_transcript_is_used_when_heard() {
    use voxbot_channels::VoiceChannel;
    use voxbot_core::channel::ListenParams;

    let ear = VoiceChannel::new("sh", vec!["-c".into(), "echo 'Hello there'".into()], ListenParams::default());
    let resolver = InputResolver::new()
        .add(Box::new(ear))
        .add(Box::new(TextChannel::from_reader("".as_bytes(), "")));
    let selector = ResponseSelector::new(pool()).with_table(table());

    let output = RecordingOutput::default();
    let session = Session::new(resolver, Arc::new(selector), vec![Box::new(output.clone())], SessionConfig::default())
        .unwrap();
    let outcome = session.process("Hello there", ChannelId("voice".into())).await;
    assert_eq!(outcome.turn.reply, "Hello! How can I help you today?");

    // The recognizer keeps hearing "Hello there", so stop via interrupt.
    let summary = session.run_until(tokio::time::sleep(Duration::from_millis(500))).await;
    assert_eq!(summary.reason, EndReason::Interrupted);
    assert!(summary.turn_count() >= 1);
    assert_eq!(summary.last_turn.unwrap().channel, ChannelId("voice".into()));
    assert_eq!(output.lines()[1], "Hello! How can I help you today?");
}

// ── Configuration ────────────────────────────────────────────────────────

#[tokio::test]
async fn session_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
bot_name = "Echo"

[sources]
order = []

[session]
exit_words = ["enough"]

[[patterns]]
pattern = '\bping\b'
replies = ["pong"]
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    let selector = voxbot_knowledge::selector_from_config(&config, Some(5)).unwrap();
    let output = RecordingOutput::default();
    let session = Session::new(
        typed("PING\nwho are you\nbye\nenough\n"),
        Arc::new(selector),
        vec![Box::new(output.clone())],
        config.session.clone(),
    )
    .unwrap();

    let summary = session.run_until(std::future::pending()).await;
    let lines = output.lines();

    assert_eq!(lines[1], "pong");
    assert_eq!(lines[2], "I'm Echo, your personal assistant!");
    // "bye" is not an exit word here; the built-in goodbye rule answers it
    assert_eq!(lines[3], "Goodbye! Have a great day!");
    assert_eq!(summary.reason, EndReason::ExitPhrase);
    assert_eq!(summary.turn_count(), 4);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[selector]\nmax_answer_chars = 50\n").unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}
