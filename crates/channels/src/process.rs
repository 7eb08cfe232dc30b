//! External command plumbing shared by the voice and speech channels.

use std::io::ErrorKind;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;
use voxbot_core::error::ChannelError;

/// A program plus its arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.envs {
            cmd.env(k, v);
        }
        cmd
    }
}

/// Map a spawn failure onto the channel taxonomy.
///
/// A program that cannot be started at all means the channel is gone for
/// this session.
pub(crate) fn spawn_error(channel: &str, program: &str, err: std::io::Error) -> ChannelError {
    match err.kind() {
        ErrorKind::NotFound => ChannelError::Unavailable(format!("{channel}: '{program}' not found")),
        ErrorKind::PermissionDenied => {
            ChannelError::Unavailable(format!("{channel}: '{program}' not executable"))
        }
        _ => ChannelError::Unavailable(format!("{channel}: failed to start '{program}': {err}")),
    }
}

/// Run a command to completion, capturing stdout/stderr, bounded by `timeout`.
///
/// The child is killed if the timeout fires or the caller is cancelled.
pub async fn run_captured(
    channel: &str,
    spec: &CommandSpec,
    timeout: Duration,
) -> Result<Output, ChannelError> {
    debug!(channel = %channel, program = %spec.program, "Running external command");

    let mut cmd = spec.command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| spawn_error(channel, &spec.program, e))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ChannelError::Io(e.to_string())),
        Err(_) => Err(ChannelError::Timeout {
            channel: channel.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}
