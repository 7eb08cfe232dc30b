//! Output channels — console print and spoken replies.
//!
//! Every reply is printed; speech is layered on top when enabled. Speech is
//! fire-and-forget: the synthesizer is spawned, fed the text on stdin and
//! reaped in the background so the next turn can start immediately.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use voxbot_config::SpeechConfig;
use voxbot_core::channel::{OutputChannel, SpeechParams};
use voxbot_core::error::ChannelError;
use voxbot_core::text::truncate_chars;

use crate::process::{CommandSpec, spawn_error};

/// Prints `<label>: <reply>` to stdout, truncating long replies.
pub struct ConsoleOutput {
    label: String,
    display_chars: usize,
}

impl ConsoleOutput {
    pub fn new(label: impl Into<String>, display_chars: usize) -> Self {
        Self {
            label: label.into(),
            display_chars,
        }
    }

    /// The exact line that would be printed.
    pub fn format(&self, text: &str) -> String {
        format!("{}: {}", self.label, truncate_chars(text, self.display_chars))
    }
}

#[async_trait]
impl OutputChannel for ConsoleOutput {
    fn name(&self) -> &str {
        "console"
    }

    async fn emit(&self, text: &str) -> Result<(), ChannelError> {
        println!();
        println!("{}", self.format(text));
        println!();
        Ok(())
    }
}

/// Speaks replies through an external synthesizer.
pub struct SpeechOutput {
    program: String,
    args: Vec<String>,
    params: SpeechParams,
    spoken_chars: usize,
}

impl SpeechOutput {
    pub fn new(program: impl Into<String>, args: Vec<String>, params: SpeechParams, spoken_chars: usize) -> Self {
        Self {
            program: program.into(),
            args,
            params,
            spoken_chars,
        }
    }

    /// Build from the `[speech]` config section.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let params = SpeechParams {
            rate: config.rate,
            volume: config.volume,
        };
        Self::new(&config.command, config.args.clone(), params, config.spoken_chars)
    }

    /// Arguments with `{rate}`, `{wpm}` and `{volume}` substituted.
    pub fn command(&self) -> CommandSpec {
        let args = self
            .args
            .iter()
            .map(|a| {
                a.replace("{rate}", &self.params.rate.to_string())
                    .replace("{wpm}", &self.params.words_per_minute().to_string())
                    .replace("{volume}", &self.params.volume.to_string())
            })
            .collect();
        CommandSpec::new(&self.program, args)
    }

    /// The text actually handed to the synthesizer.
    pub fn spoken_text(&self, text: &str) -> String {
        let clipped: String = text.chars().take(self.spoken_chars).collect();
        clipped.replace('\n', " ")
    }
}

#[async_trait]
impl OutputChannel for SpeechOutput {
    fn name(&self) -> &str {
        "speech"
    }

    async fn emit(&self, text: &str) -> Result<(), ChannelError> {
        let spoken = self.spoken_text(text);
        if spoken.trim().is_empty() {
            return Ok(());
        }

        let mut cmd = self.command().command();
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = cmd
            .spawn()
            .map_err(|e| spawn_error("speech", &self.program, e))?;

        let stdin = child.stdin.take();
        tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(spoken.as_bytes()).await {
                    debug!(error = %e, "Synthesizer closed stdin early");
                }
                drop(stdin);
            }
            if let Err(e) = child.wait().await {
                debug!(error = %e, "Synthesizer did not exit cleanly");
            }
        });

        Ok(())
    }
}
