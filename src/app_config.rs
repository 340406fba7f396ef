use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Wiki the transcripts are scraped from
    #[serde(default)]
    pub wiki: WikiConfig,

    /// Text-to-speech provider settings
    #[serde(default)]
    pub tts: TtsConfig,

    /// Output locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Wiki access configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WikiConfig {
    /// Base URL of the wiki (scheme and host)
    #[serde(default = "default_wiki_base_url")]
    pub base_url: String,

    /// Site name as it appears in page titles ("... - OSRS Wiki")
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Path of the category page listing quest transcripts
    #[serde(default = "default_category_path")]
    pub category_path: String,

    /// User-Agent sent with every wiki request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_wiki_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: default_wiki_base_url(),
            site_name: default_site_name(),
            category_path: default_category_path(),
            user_agent: default_user_agent(),
            timeout_secs: default_wiki_timeout_secs(),
        }
    }
}

impl WikiConfig {
    /// Full URL of the quest transcript category page
    pub fn category_url(&self) -> String {
        self.absolute_url(&self.category_path)
    }

    /// Resolve a wiki-relative link ("/w/...") against the base URL
    pub fn absolute_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            link.trim_start_matches('/')
        )
    }
}

/// Voice tuning sent with every synthesis request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Lower values give a more expressive, less stable delivery (0.0 to 1.0)
    #[serde(default = "default_stability")]
    pub stability: f32,

    /// How closely the output sticks to the source voice (0.0 to 1.0)
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    /// Style exaggeration (0.0 to 1.0)
    #[serde(default = "default_style")]
    pub style: f32,

    #[serde(default = "default_true")]
    pub use_speaker_boost: bool,

    /// Speaking rate multiplier
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: default_style(),
            use_speaker_boost: true,
            speed: default_speed(),
        }
    }
}

/// Text-to-speech service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TtsConfig {
    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Synthesis model identifier
    #[serde(default = "default_tts_model")]
    pub model_id: String,

    /// Audio encoding requested from the service
    #[serde(default = "default_output_format")]
    pub output_format: String,

    #[serde(default)]
    pub voice_settings: VoiceSettings,

    /// Request timeout in seconds
    #[serde(default = "default_tts_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit in requests per minute (None disables client-side limiting)
    #[serde(default = "default_tts_rate_limit")]
    pub rate_limit: Option<u32>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_tts_endpoint(),
            model_id: default_tts_model(),
            output_format: default_output_format(),
            voice_settings: VoiceSettings::default(),
            timeout_secs: default_tts_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: default_tts_rate_limit(),
        }
    }
}

/// Output locations
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory extracted transcripts are written to
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: PathBuf,

    /// Directory generated audio clips are written to
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// SQLite database holding voiced dialogue metadata
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            transcripts_dir: default_transcripts_dir(),
            audio_dir: default_audio_dir(),
            database_path: default_database_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_wiki_base_url() -> String {
    "https://oldschool.runescape.wiki".to_string()
}

fn default_site_name() -> String {
    "OSRS".to_string()
}

fn default_category_path() -> String {
    "/w/Category:Quest_transcript".to_string()
}

fn default_user_agent() -> String {
    "OSRS-Quest-Voiceover-Extractor/1.0 (https://github.com/runelite-quest-voiceover)".to_string()
}

fn default_wiki_timeout_secs() -> u64 {
    30
}

fn default_tts_endpoint() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_tts_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_output_format() -> String {
    "mp3_44100_96".to_string()
}

fn default_stability() -> f32 {
    0.3
}

fn default_similarity_boost() -> f32 {
    0.7
}

fn default_style() -> f32 {
    0.4
}

fn default_speed() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_tts_timeout_secs() -> u64 {
    60
}

/// Upper bound for `tts.retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_tts_rate_limit() -> Option<u32> {
    Some(60) // 60 requests per minute by default
}

fn default_transcripts_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("output_voiceover")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("output_db").join("quest_voiceover.db")
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path));
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &config_json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let base_url = self.wiki.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow!("Wiki base URL must not be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow!("Wiki base URL must use http or https: {}", base_url));
        }
        if self.wiki.site_name.trim().is_empty() {
            return Err(anyhow!("Wiki site name must not be empty"));
        }
        if self.wiki.user_agent.trim().is_empty() {
            return Err(anyhow!("Wiki user agent must not be empty"));
        }
        if self.wiki.timeout_secs == 0 || self.tts.timeout_secs == 0 {
            return Err(anyhow!("Request timeouts must be greater than zero"));
        }

        let settings = &self.tts.voice_settings;
        for (name, value) in [
            ("stability", settings.stability),
            ("similarity_boost", settings.similarity_boost),
            ("style", settings.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("Voice setting {} must be between 0.0 and 1.0, got {}", name, value));
            }
        }
        if settings.speed <= 0.0 || settings.speed > 4.0 {
            return Err(anyhow!("Voice speed must be in (0.0, 4.0], got {}", settings.speed));
        }

        if self.tts.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!(
                "TTS retry count must be at most {}, got {}",
                MAX_RETRY_COUNT,
                self.tts.retry_count
            ));
        }

        if self.tts.rate_limit == Some(0) {
            return Err(anyhow!("TTS rate limit must be greater than zero (omit it to disable limiting)"));
        }

        Ok(())
    }

    /// Check that the TTS provider can be called
    pub fn require_api_key(&self) -> Result<()> {
        if self.tts.api_key.trim().is_empty() {
            return Err(anyhow!(
                "TTS API key is required (set ELEVENLABS_API_KEY, pass --api-key, or add tts.api_key to the config)"
            ));
        }
        Ok(())
    }
}
