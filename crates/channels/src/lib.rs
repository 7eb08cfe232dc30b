//! Input and output channels for Voxbot.
//!
//! Input channels obtain one unit of user text per turn; output channels
//! render replies. Channels are trait-based and platform-agnostic: the
//! speech engines are external commands, so nothing here links an audio SDK.
//!
//! Available channels:
//! - **Voice** — external speech recognizer (microphone)
//! - **Text** — typed input from stdin, the fallback that always answers
//! - **Console** — prints replies
//! - **Speech** — external speech synthesizer
//! - **Resolver** — ordered fallback across input channels

pub mod output;
pub mod process;
pub mod resolver;
pub mod text;
pub mod voice;

pub use output::{ConsoleOutput, SpeechOutput};
pub use resolver::{InputResolver, Resolution};
pub use text::TextChannel;
pub use voice::VoiceChannel;

use voxbot_config::AppConfig;
use voxbot_core::channel::OutputChannel;

/// Prompt shown before typed input.
pub const TEXT_PROMPT: &str = "  You > ";

/// Build the input chain: voice first (when enabled), typed text last.
pub fn resolver_from_config(config: &AppConfig, text_only: bool) -> InputResolver {
    let mut resolver = InputResolver::new().demote_unavailable(config.voice.demote_on_device_error);

    if config.voice.enabled && !text_only {
        resolver = resolver.add(Box::new(VoiceChannel::from_config(&config.voice)));
    }

    resolver.add(Box::new(TextChannel::stdin(TEXT_PROMPT)))
}

/// Build the output set: console always, speech when enabled and not muted.
pub fn outputs_from_config(config: &AppConfig, mute: bool) -> Vec<Box<dyn OutputChannel>> {
    let mut outputs: Vec<Box<dyn OutputChannel>> = vec![Box::new(ConsoleOutput::new(
        &config.bot_name,
        config.speech.display_chars,
    ))];

    if config.speech.enabled && !mute {
        outputs.push(Box::new(SpeechOutput::from_config(&config.speech)));
    }

    outputs
}
