//! `voxbot onboard` — First-time setup.

use voxbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🎙️  Voxbot — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Point [voice].command at a speech recognizer that prints its transcript");
        println!("   2. Optionally set NEWS_API_KEY and GROQ_API_KEY for news and LLM answers");
        println!("   3. Run: voxbot doctor");
        println!("   4. Run: voxbot chat\n");
    }

    println!("🎉 Setup complete! Run `voxbot chat` to start talking.\n");

    Ok(())
}
