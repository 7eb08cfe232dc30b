//! Text channel — typed input from the terminal.
//!
//! The ultimate fallback in the input chain: it blocks until the operator
//! types a line. End of input (Ctrl+D) is reported as `ChannelError::Closed`.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;
use voxbot_core::channel::{ChannelId, InputChannel};
use voxbot_core::error::ChannelError;

type LineReader = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Line-oriented typed input.
pub struct TextChannel {
    id: ChannelId,
    prompt: String,
    lines: Mutex<LineReader>,
}

impl TextChannel {
    /// Read from the process's stdin, printing `prompt` before each line.
    pub fn stdin(prompt: impl Into<String>) -> Self {
        Self::from_reader(BufReader::new(io::stdin()), prompt)
    }

    /// Read from any buffered reader (scripted input, tests).
    pub fn from_reader(reader: impl AsyncBufRead + Unpin + Send + 'static, prompt: impl Into<String>) -> Self {
        let boxed: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            id: ChannelId("text".into()),
            prompt: prompt.into(),
            lines: Mutex::new(boxed.lines()),
        }
    }
}

#[async_trait]
impl InputChannel for TextChannel {
    fn name(&self) -> &str {
        "text"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn read(&self) -> Result<Option<String>, ChannelError> {
        if !self.prompt.is_empty() {
            print!("{}", self.prompt);
            std::io::stdout()
                .flush()
                .map_err(|e| ChannelError::Io(e.to_string()))?;
        }

        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(line.to_string()))
                }
            }
            Ok(None) => Err(ChannelError::Closed), // EOF (Ctrl+D)
            Err(e) => Err(ChannelError::Io(e.to_string())),
        }
    }
}
