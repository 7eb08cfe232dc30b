pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod doctor;
pub mod onboard;
pub mod sources;

use voxbot_config::AppConfig;

/// Load the config, optionally dropping every network source.
pub fn load_config(offline: bool) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if offline {
        config.sources.order.clear();
    }
    Ok(config)
}
