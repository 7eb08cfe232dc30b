//! The Voxbot session — the loop that ties input, selection and output together.
//!
//! Each turn follows one path:
//!
//! 1. **Resolve** input from the first channel that yields text
//! 2. **Help**: the bare word `help` returns the capabilities text
//! 3. **Exit**: an exit word anywhere in the input ends the session
//! 4. **Select** a reply via the pattern table and knowledge sources
//! 5. **Emit** the reply on every output
//!
//! The loop ends on an exit word, end of input or Ctrl-C.

pub mod session;
pub mod vocabulary;

pub use session::{EndReason, Outcome, Session, SessionSummary};
pub use vocabulary::{ExitVocabulary, HELP_WORD, is_help};

use std::sync::Arc;
use voxbot_config::AppConfig;
use voxbot_core::error::Result;

/// How the operator asked to run the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Skip the voice channel
    pub text_only: bool,

    /// Skip spoken output
    pub mute: bool,

    /// Fix the default pool's RNG
    pub seed: Option<u64>,
}

/// Assemble a session from configuration.
pub fn session_from_config(config: &AppConfig, options: SessionOptions) -> Result<Session> {
    let selector = voxbot_knowledge::selector_from_config(config, options.seed)?;
    let resolver = voxbot_channels::resolver_from_config(config, options.text_only);
    let outputs = voxbot_channels::outputs_from_config(config, options.mute);
    Session::new(resolver, Arc::new(selector), outputs, config.session.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_from_default_config() {
        let config = AppConfig::default();
        let options = SessionOptions {
            text_only: true,
            mute: true,
            seed: Some(1),
        };
        assert!(session_from_config(&config, options).is_ok());
    }

    #[tokio::test]
    async fn bad_config_is_an_error() {
        let mut config = AppConfig::default();
        config.selector.default_replies.clear();
        assert!(session_from_config(&config, SessionOptions::default()).is_err());
    }
}
