//! `voxbot doctor` — Diagnose config and speech engines.

use std::path::{Path, PathBuf};
use voxbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Voxbot Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — using defaults (run `voxbot onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    if config.voice.enabled {
        match find_program(&config.voice.command) {
            Some(path) => println!("  ✅ Recognizer found: {}", path.display()),
            None => {
                println!(
                    "  ⚠️  Recognizer '{}' not found — chat will fall back to the keyboard",
                    config.voice.command
                );
                issues += 1;
            }
        }
    } else {
        println!("  ➖ Voice input disabled");
    }

    if config.speech.enabled {
        match find_program(&config.speech.command) {
            Some(path) => println!("  ✅ Synthesizer found: {}", path.display()),
            None => {
                println!(
                    "  ⚠️  Synthesizer '{}' not found — replies will only be printed",
                    config.speech.command
                );
                issues += 1;
            }
        }
    } else {
        println!("  ➖ Spoken output disabled");
    }

    for (name, key) in [
        ("news", &config.sources.news.api_key),
        ("llm", &config.sources.llm.api_key),
    ] {
        if config.sources.order.iter().any(|s| s == name) {
            if key.is_some() {
                println!("  ✅ {name} API key configured");
            } else {
                println!("  ⚠️  {name} source enabled but no API key — it will be skipped");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Resolve a program name the way the OS would when spawning it.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{program}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_not_found() {
        assert!(find_program("voxbot-definitely-not-installed").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn shell_is_found() {
        assert!(find_program("sh").is_some());
        assert_eq!(find_program("/bin/sh"), Some(PathBuf::from("/bin/sh")));
    }
}
