//! `voxbot chat` — the conversation loop.

use voxbot_agent::{EndReason, SessionOptions, session_from_config};

pub struct ChatArgs {
    pub text_only: bool,
    pub mute: bool,
    pub seed: Option<u64>,
    pub offline: bool,
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(args.offline)?;

    let options = SessionOptions {
        text_only: args.text_only,
        mute: args.mute,
        seed: args.seed,
    };
    let session = session_from_config(&config, options)?;

    let voice = config.voice.enabled && !args.text_only;
    let speech = config.speech.enabled && !args.mute;
    let sources = if config.sources.order.is_empty() {
        "offline (pattern table only)".to_string()
    } else {
        config.sources.order.join(" → ")
    };

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║            Voxbot — Conversation              ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Input:    {}", if voice { "voice, then keyboard" } else { "keyboard" });
    println!("  Speech:   {}", if speech { "on" } else { "off" });
    println!("  Sources:  {sources}");
    println!();
    println!("  Say 'help' for ideas. Say 'goodbye' or press Ctrl+C to quit.");

    let summary = session.run().await;

    if summary.reason == EndReason::Interrupted {
        eprintln!();
    }
    tracing::info!(turns = summary.turn_count(), reason = %summary.reason, "Chat finished");

    Ok(())
}
