//! The turn loop.
//!
//! Each turn: resolve input, answer `help`, stop on an exit word, otherwise
//! select a reply and emit it. The loop races every turn against an
//! interrupt signal; an interrupt drops the in-flight turn (killing any
//! recognizer child) and ends the session with a single farewell.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};
use voxbot_channels::{InputResolver, Resolution};
use voxbot_config::SessionConfig;
use voxbot_core::channel::{ChannelId, OutputChannel};
use voxbot_core::error::Result;
use voxbot_core::turn::{ReplyOrigin, Turn};
use voxbot_knowledge::ResponseSelector;

use crate::vocabulary::{ExitVocabulary, is_help};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user said an exit word
    ExitPhrase,

    /// Input reached end of file
    InputClosed,

    /// Ctrl-C
    Interrupted,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExitPhrase => write!(f, "exit phrase"),
            Self::InputClosed => write!(f, "input closed"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// What a finished session did. Turns are not retained; only the count and
/// the final one survive.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub turns: usize,
    pub last_turn: Option<Turn>,
    pub reason: EndReason,
}

impl SessionSummary {
    pub fn turn_count(&self) -> usize {
        self.turns
    }
}

/// The decision for one unit of input.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub turn: Turn,
    /// The session should stop after emitting this reply
    pub ends_session: bool,
}

pub struct Session {
    resolver: InputResolver,
    selector: Arc<ResponseSelector>,
    outputs: Vec<Box<dyn OutputChannel>>,
    config: SessionConfig,
    exit: ExitVocabulary,
    turns: usize,
    last_turn: Option<Turn>,
}

impl Session {
    pub fn new(
        resolver: InputResolver,
        selector: Arc<ResponseSelector>,
        outputs: Vec<Box<dyn OutputChannel>>,
        config: SessionConfig,
    ) -> Result<Self> {
        let exit = ExitVocabulary::new(&config.exit_words)?;
        Ok(Self {
            resolver,
            selector,
            outputs,
            config,
            exit,
            turns: 0,
            last_turn: None,
        })
    }

    /// Decide the reply for one input without emitting it.
    pub async fn process(&self, input: &str, channel: ChannelId) -> Outcome {
        if self.config.help_enabled && is_help(input) {
            return Outcome {
                turn: Turn::new(input, channel, ReplyOrigin::Help, &self.config.help_text),
                ends_session: false,
            };
        }

        if self.exit.matches(input) {
            return Outcome {
                turn: Turn::new(input, channel, ReplyOrigin::Farewell, &self.config.farewell),
                ends_session: true,
            };
        }

        let selection = self.selector.select(input).await;
        Outcome {
            turn: Turn::new(input, channel, selection.origin, selection.reply),
            ends_session: false,
        }
    }

    /// Run until an exit word, end of input or Ctrl-C.
    pub async fn run(self) -> SessionSummary {
        self.run_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler on this platform; never interrupt.
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until an exit word, end of input or `interrupt` completes.
    pub async fn run_until(mut self, interrupt: impl Future<Output = ()>) -> SessionSummary {
        tokio::pin!(interrupt);

        let greeting = self.config.greeting.clone();
        self.emit(&greeting).await;

        let reason = loop {
            let step = tokio::select! {
                step = self.step() => step,
                _ = &mut interrupt => Some(EndReason::Interrupted),
            };
            if let Some(reason) = step {
                break reason;
            }
        };

        if reason != EndReason::ExitPhrase {
            let farewell = self.config.interrupt_farewell.clone();
            self.emit(&farewell).await;
        }

        info!(turns = self.turns, %reason, "Session ended");
        SessionSummary {
            turns: self.turns,
            last_turn: self.last_turn,
            reason,
        }
    }

    /// One turn. `Some` when the session should end.
    async fn step(&mut self) -> Option<EndReason> {
        let (text, channel) = match self.resolver.resolve().await {
            Resolution::Input { text, channel } => (text, channel),
            Resolution::Empty => return None,
            Resolution::Closed => return Some(EndReason::InputClosed),
        };

        let outcome = self.process(&text, channel).await;
        debug!(
            turn = %outcome.turn.id,
            channel = %outcome.turn.channel,
            origin = %outcome.turn.origin,
            "Turn complete"
        );

        self.emit(&outcome.turn.reply).await;
        self.turns += 1;
        self.last_turn = Some(outcome.turn);

        outcome.ends_session.then_some(EndReason::ExitPhrase)
    }

    async fn emit(&self, text: &str) {
        for output in &self.outputs {
            if let Err(e) = output.emit(text).await {
                debug!(output = output.name(), error = %e, "Output failed");
            }
        }
    }
}
