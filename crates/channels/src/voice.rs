//! Voice channel — speech recognition through an external recognizer.
//!
//! The recognizer is any program that listens on the default microphone and
//! prints the transcript on stdout. Listening parameters are passed as
//! environment variables:
//!
//! | Variable                   | Meaning                              |
//! |----------------------------|--------------------------------------|
//! | `VOXBOT_CALIBRATION_SECS`  | ambient-noise calibration duration   |
//! | `VOXBOT_ENERGY_THRESHOLD`  | minimum energy treated as speech     |
//! | `VOXBOT_LISTEN_SECS`       | how long to wait for speech to start |
//! | `VOXBOT_PHRASE_SECS`       | maximum phrase duration              |
//!
//! Exit status is interpreted as: transcript on stdout → input; exit 0 with
//! nothing printed → unrecognized; non-zero exit → service error; program
//! missing → channel unavailable.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use voxbot_config::{MAX_CALIBRATION_SECS, VoiceConfig};
use voxbot_core::channel::{ChannelId, InputChannel, ListenParams};
use voxbot_core::error::ChannelError;

use crate::process::{CommandSpec, run_captured};

/// Extra time granted to the recognizer process beyond its listening window.
const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Microphone input via an external recognizer command.
pub struct VoiceChannel {
    id: ChannelId,
    command: CommandSpec,
    params: ListenParams,
    grace: Duration,
}

impl VoiceChannel {
    pub fn new(program: impl Into<String>, args: Vec<String>, params: ListenParams) -> Self {
        let command = CommandSpec::new(program, args)
            .env("VOXBOT_CALIBRATION_SECS", format!("{:.1}", params.calibration.as_secs_f32()))
            .env("VOXBOT_ENERGY_THRESHOLD", params.energy_threshold.to_string())
            .env("VOXBOT_LISTEN_SECS", params.listen_timeout.as_secs().to_string())
            .env("VOXBOT_PHRASE_SECS", params.phrase_limit.as_secs().to_string());

        Self {
            id: ChannelId("voice".into()),
            command,
            params,
            grace: DEFAULT_GRACE,
        }
    }

    /// Build from the `[voice]` config section.
    pub fn from_config(config: &VoiceConfig) -> Self {
        let params = ListenParams {
            calibration: Duration::from_secs_f32(config.calibration_secs.max(0.0).min(MAX_CALIBRATION_SECS)),
            energy_threshold: config.energy_threshold,
            listen_timeout: Duration::from_secs(config.listen_secs),
            phrase_limit: Duration::from_secs(config.phrase_secs),
        };
        Self::new(&config.command, config.args.clone(), params)
    }

    /// Override the slack given to the recognizer process.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn params(&self) -> &ListenParams {
        &self.params
    }

    /// Hard cap on one recognizer run.
    pub fn process_timeout(&self) -> Duration {
        self.params
            .calibration
            .saturating_add(self.params.listen_timeout)
            .saturating_add(self.grace)
    }
}

#[async_trait]
impl InputChannel for VoiceChannel {
    fn name(&self) -> &str {
        "voice"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn read(&self) -> Result<Option<String>, ChannelError> {
        info!(
            listen_secs = self.params.listen_timeout.as_secs(),
            "Listening for speech"
        );

        let output = run_captured("voice", &self.command, self.process_timeout()).await?;
        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ChannelError::Service {
                channel: "voice".into(),
                reason: if stderr.is_empty() {
                    format!("recognizer exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        if transcript.is_empty() {
            debug!("Recognizer returned no transcript");
            return Err(ChannelError::Unrecognized);
        }

        Ok(Some(transcript))
    }
}
