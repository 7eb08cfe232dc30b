//! `voxbot config` — Configuration management commands.

use voxbot_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.sources.order.iter().any(|s| s == "news") && config.sources.news.api_key.is_none() {
                warnings.push("News source enabled without an API key (set NEWS_API_KEY); it will be skipped");
            }

            if config.sources.order.iter().any(|s| s == "llm") && config.sources.llm.api_key.is_none() {
                warnings.push("LLM source enabled without an API key (set GROQ_API_KEY); it will be skipped");
            }

            if config.is_offline() {
                warnings.push("No network sources configured; unmatched input gets a generic reply");
            }

            if let Err(e) = voxbot_knowledge::PatternTable::with_overrides(&config.bot_name, &config.patterns) {
                warnings.push("A custom pattern failed to compile");
                println!("   ❌ {e}");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Bot name:  {}", config.bot_name);
            println!("   Voice:     {}", if config.voice.enabled { "on" } else { "off" });
            println!("   Speech:    {}", if config.speech.enabled { "on" } else { "off" });
            println!("   Sources:   {}", config.sources.order.join(", "));
            println!("   Patterns:  {} custom", config.patterns.len());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
