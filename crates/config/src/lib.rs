//! Configuration loading, validation, and management for Voxbot.
//!
//! Loads configuration from `~/.voxbot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Knowledge source names accepted in `sources.order`.
pub const KNOWN_SOURCES: &[&str] = &["patterns", "web_search", "wikipedia", "weather", "news", "llm"];

/// Upper bound for `voice.calibration_secs`.
pub const MAX_CALIBRATION_SECS: f32 = 30.0;

/// Upper bound for `voice.listen_secs` and `voice.phrase_secs`.
pub const MAX_LISTEN_SECS: u64 = 300;

/// The root configuration structure.
///
/// Maps directly to `~/.voxbot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name the bot uses for itself in replies and console output
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Speech recognition (input) settings
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Speech synthesis (output) settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Response selection settings
    #[serde(default)]
    pub selector: SelectorConfig,

    /// External knowledge source settings
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Turn loop vocabulary and canned messages
    #[serde(default)]
    pub session: SessionConfig,

    /// Extra pattern rules, evaluated before the built-in table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternConfig>,
}

fn default_bot_name() -> String {
    "ChatBot".into()
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Recognizer program; prints the transcript on stdout
    #[serde(default = "default_recognizer_command")]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_calibration_secs")]
    pub calibration_secs: f32,

    #[serde(default = "default_energy_threshold")]
    pub energy_threshold: u32,

    #[serde(default = "default_listen_secs")]
    pub listen_secs: u64,

    #[serde(default = "default_phrase_secs")]
    pub phrase_secs: u64,

    /// Stop trying the microphone after a hard device error
    #[serde(default = "default_true")]
    pub demote_on_device_error: bool,
}

fn default_recognizer_command() -> String {
    "voxbot-listen".into()
}
fn default_calibration_secs() -> f32 {
    1.0
}
fn default_energy_threshold() -> u32 {
    4000
}
fn default_listen_secs() -> u64 {
    10
}
fn default_phrase_secs() -> u64 {
    10
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_recognizer_command(),
            args: vec![],
            calibration_secs: default_calibration_secs(),
            energy_threshold: default_energy_threshold(),
            listen_secs: default_listen_secs(),
            phrase_secs: default_phrase_secs(),
            demote_on_device_error: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Synthesizer program; reads the text on stdin
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Arguments; `{rate}` (relative, -10..=10), `{wpm}` (rate as words per
    /// minute) and `{volume}` are substituted
    #[serde(default = "default_speech_args")]
    pub args: Vec<String>,

    #[serde(default = "default_rate")]
    pub rate: i32,

    #[serde(default = "default_volume")]
    pub volume: u32,

    /// Characters printed to the console before truncation
    #[serde(default = "default_display_chars")]
    pub display_chars: usize,

    /// Characters sent to the synthesizer
    #[serde(default = "default_spoken_chars")]
    pub spoken_chars: usize,
}

fn default_speech_command() -> String {
    "espeak".into()
}
fn default_speech_args() -> Vec<String> {
    vec!["--stdin".into(), "-s".into(), "{wpm}".into(), "-a".into(), "{volume}".into()]
}
fn default_rate() -> i32 {
    1
}
fn default_volume() -> u32 {
    100
}
fn default_display_chars() -> usize {
    300
}
fn default_spoken_chars() -> usize {
    800
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_speech_command(),
            args: default_speech_args(),
            rate: default_rate(),
            volume: default_volume(),
            display_chars: default_display_chars(),
            spoken_chars: default_spoken_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Consult the pattern table before any external source
    #[serde(default = "default_true")]
    pub use_pattern_table: bool,

    /// Answers must be strictly longer than this (trimmed chars)
    #[serde(default = "default_min_answer_chars")]
    pub min_answer_chars: usize,

    /// Cleaned answers are truncated to this many chars
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,

    /// Reply when every source comes back empty; `{query}` is substituted
    #[serde(default = "default_apology_template")]
    pub apology_template: String,

    /// Replies drawn at random when nothing else applies
    #[serde(default = "default_replies")]
    pub default_replies: Vec<String>,
}

fn default_min_answer_chars() -> usize {
    10
}
fn default_max_answer_chars() -> usize {
    1500
}
fn default_apology_template() -> String {
    "I couldn't find specific information about '{query}' from available sources. \
     Try rephrasing your question or ask something more specific."
        .into()
}
fn default_replies() -> Vec<String> {
    vec![
        "I'm not sure I understand. Could you rephrase that?".into(),
        "That's interesting! Tell me more.".into(),
        "I'm still learning. Can you ask me something else?".into(),
        "Sorry, I didn't quite catch that. Try asking differently!".into(),
    ]
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            use_pattern_table: true,
            min_answer_chars: default_min_answer_chars(),
            max_answer_chars: default_max_answer_chars(),
            apology_template: default_apology_template(),
            default_replies: default_replies(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Priority order; first qualifying answer wins. Empty = offline.
    #[serde(default = "default_source_order")]
    pub order: Vec<String>,

    /// Per-source timeout unless overridden
    #[serde(default = "default_source_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub web_search: WebSearchConfig,

    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_source_order() -> Vec<String> {
    vec!["weather".into(), "news".into(), "web_search".into(), "wikipedia".into()]
}
fn default_source_timeout_secs() -> u64 {
    5
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            order: default_source_order(),
            timeout_secs: default_source_timeout_secs(),
            web_search: WebSearchConfig::default(),
            wikipedia: WikipediaConfig::default(),
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    #[serde(default = "default_web_search_url")]
    pub api_url: String,
}

fn default_web_search_url() -> String {
    "https://api.duckduckgo.com/".into()
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self { api_url: default_web_search_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_wikipedia_url")]
    pub api_url: String,

    /// Sentences kept from the page summary
    #[serde(default = "default_sentences")]
    pub sentences: usize,
}

fn default_wikipedia_url() -> String {
    "https://en.wikipedia.org".into()
}
fn default_sentences() -> usize {
    4
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_url: default_wikipedia_url(),
            sentences: default_sentences(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Used when no city survives stop-word stripping
    #[serde(default = "default_city")]
    pub default_city: String,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".into()
}
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}
fn default_city() -> String {
    "London".into()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            default_city: default_city(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_news_url")]
    pub api_url: String,
}

fn default_news_url() -> String {
    "https://newsapi.org/v2/everything".into()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_news_url(),
        }
    }
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible base URL (without `/chat/completions`)
    #[serde(default = "default_llm_url")]
    pub api_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_llm_model() -> String {
    "llama-3.1-8b-instant".into()
}
fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Answer questions clearly and concisely.".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_llm_timeout_secs() -> u64 {
    10
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_llm_url(),
            model: default_llm_model(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Spoken when an exit word is heard
    #[serde(default = "default_farewell")]
    pub farewell: String,

    /// Spoken on Ctrl-C or end of input
    #[serde(default = "default_interrupt_farewell")]
    pub interrupt_farewell: String,

    /// Whole words that end the session
    #[serde(default = "default_exit_words")]
    pub exit_words: Vec<String>,

    #[serde(default = "default_true")]
    pub help_enabled: bool,

    #[serde(default = "default_help_text")]
    pub help_text: String,
}

fn default_greeting() -> String {
    "Hello! I'm ready to listen to your questions. What would you like to know?".into()
}
fn default_farewell() -> String {
    "Goodbye! Thanks for chatting. Have a great day!".into()
}
fn default_interrupt_farewell() -> String {
    "Goodbye! See you soon!".into()
}
fn default_exit_words() -> Vec<String> {
    ["goodbye", "bye", "exit", "quit", "stop", "end", "close"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}
fn default_help_text() -> String {
    "You can ask me about: weather, facts, places, people, science, technology, \
     current events, and more! Just ask naturally."
        .into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            farewell: default_farewell(),
            interrupt_farewell: default_interrupt_farewell(),
            exit_words: default_exit_words(),
            help_enabled: true,
            help_text: default_help_text(),
        }
    }
}

/// A user-defined pattern rule with literal replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Regular expression searched in the lower-cased input
    pub pattern: String,

    /// Candidate replies; the first one is used
    pub replies: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.voxbot/config.toml).
    ///
    /// Also checks environment variables:
    /// - `VOXBOT_NEWS_API_KEY`, then `NEWS_API_KEY`
    /// - `VOXBOT_LLM_API_KEY`, then `GROQ_API_KEY`, then `OPENAI_API_KEY`
    /// - `VOXBOT_VOICE` (`on`/`off`)
    /// - `VOXBOT_SOURCES` (comma-separated priority order)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.sources.news.api_key.is_none() {
            self.sources.news.api_key = lookup("VOXBOT_NEWS_API_KEY").or_else(|| lookup("NEWS_API_KEY"));
        }

        if self.sources.llm.api_key.is_none() {
            self.sources.llm.api_key = lookup("VOXBOT_LLM_API_KEY")
                .or_else(|| lookup("GROQ_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(voice) = lookup("VOXBOT_VOICE") {
            match voice.trim().to_ascii_lowercase().as_str() {
                "on" | "1" | "true" => self.voice.enabled = true,
                "off" | "0" | "false" => self.voice.enabled = false,
                other => tracing::warn!(value = %other, "Ignoring unrecognized VOXBOT_VOICE"),
            }
        }

        if let Some(order) = lookup("VOXBOT_SOURCES") {
            self.sources.order = order
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".voxbot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.default_replies.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "selector.default_replies must contain at least one non-empty reply".into(),
            ));
        }

        if !(100..=5000).contains(&self.selector.max_answer_chars) {
            return Err(ConfigError::ValidationError(
                "selector.max_answer_chars must be between 100 and 5000".into(),
            ));
        }

        if self.selector.min_answer_chars >= self.selector.max_answer_chars {
            return Err(ConfigError::ValidationError(
                "selector.min_answer_chars must be less than max_answer_chars".into(),
            ));
        }

        if self.speech.volume > 100 {
            return Err(ConfigError::ValidationError("speech.volume must be between 0 and 100".into()));
        }

        if !(-10..=10).contains(&self.speech.rate) {
            return Err(ConfigError::ValidationError("speech.rate must be between -10 and 10".into()));
        }

        if let Some(unknown) = self
            .sources
            .order
            .iter()
            .find(|name| !KNOWN_SOURCES.contains(&name.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "unknown knowledge source '{unknown}' (known: {})",
                KNOWN_SOURCES.join(", ")
            )));
        }

        if self.sources.timeout_secs == 0 || self.sources.llm.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("source timeouts must be > 0".into()));
        }

        if !(1..=MAX_LISTEN_SECS).contains(&self.voice.listen_secs)
            || !(1..=MAX_LISTEN_SECS).contains(&self.voice.phrase_secs)
        {
            return Err(ConfigError::ValidationError(format!(
                "voice.listen_secs and voice.phrase_secs must be between 1 and {MAX_LISTEN_SECS}"
            )));
        }

        if !(0.0..=MAX_CALIBRATION_SECS).contains(&self.voice.calibration_secs) {
            return Err(ConfigError::ValidationError(format!(
                "voice.calibration_secs must be between 0 and {MAX_CALIBRATION_SECS}"
            )));
        }

        if self.session.exit_words.iter().all(|w| w.trim().is_empty()) {
            return Err(ConfigError::ValidationError("session.exit_words must not be empty".into()));
        }

        if let Some(rule) = self.patterns.iter().find(|p| p.replies.is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "pattern '{}' has no replies",
                rule.pattern
            )));
        }

        Ok(())
    }

    /// Whether any network-backed source is configured.
    pub fn is_offline(&self) -> bool {
        self.sources.order.iter().all(|s| s == "patterns")
    }

    /// A copy with API keys masked, safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for key in [&mut config.sources.news.api_key, &mut config.sources.llm.api_key] {
            if key.is_some() {
                *key = Some("[REDACTED]".into());
            }
        }
        config
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            voice: VoiceConfig::default(),
            speech: SpeechConfig::default(),
            selector: SelectorConfig::default(),
            sources: SourcesConfig::default(),
            session: SessionConfig::default(),
            patterns: vec![],
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
