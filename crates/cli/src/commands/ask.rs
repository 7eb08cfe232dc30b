//! `voxbot ask` — answer one message and exit.

use std::sync::Arc;
use voxbot_agent::Session;
use voxbot_channels::InputResolver;
use voxbot_core::channel::ChannelId;

pub async fn run(message: &str, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let message = message.trim();
    if message.is_empty() {
        return Err("Message must not be empty".into());
    }

    let config = super::load_config(offline)?;
    let selector = voxbot_knowledge::selector_from_config(&config, None)?;
    let session = Session::new(InputResolver::new(), Arc::new(selector), vec![], config.session.clone())?;

    let outcome = session.process(message, ChannelId::from("cli")).await;
    tracing::debug!(origin = %outcome.turn.origin, "Answered");
    println!("{}", outcome.turn.reply);

    Ok(())
}
