//! `voxbot sources` — Show the configured knowledge chain.

use voxbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    for line in describe(&config) {
        println!("{line}");
    }
    Ok(())
}

/// One line per stage of response selection, in the order they are tried.
pub fn describe(config: &AppConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let custom = config.patterns.len();

    if config.selector.use_pattern_table {
        lines.push(format!("  0. pattern table ({custom} custom rule(s) + built-in)"));
    }

    for (i, name) in config.sources.order.iter().enumerate() {
        let timeout = if name == "llm" {
            config.sources.llm.timeout_secs
        } else {
            config.sources.timeout_secs
        };
        let note = match name.as_str() {
            "news" if config.sources.news.api_key.is_none() => " — no API key, skipped",
            "llm" if config.sources.llm.api_key.is_none() => " — no API key, skipped",
            "weather" => " — weather questions only",
            "news" => " — news questions only",
            _ => "",
        };
        lines.push(format!("  {}. {name} ({timeout}s){note}", i + 1));
    }

    let fallback = if config.is_offline() {
        "random default reply"
    } else {
        "apology"
    };
    lines.push(format!("  ↳ otherwise: {fallback}"));
    lines
}
