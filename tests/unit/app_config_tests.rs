/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::path::PathBuf;
use questvox::app_config::{Config, LogLevel, MAX_RETRY_COUNT};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.wiki.base_url, "https://oldschool.runescape.wiki");
    assert_eq!(config.wiki.site_name, "OSRS");
    assert_eq!(config.wiki.timeout_secs, 30);
    assert!(config.wiki.user_agent.starts_with("OSRS-Quest-Voiceover-Extractor/1.0"));

    assert_eq!(config.tts.endpoint, "https://api.elevenlabs.io");
    assert_eq!(config.tts.model_id, "eleven_multilingual_v2");
    assert_eq!(config.tts.output_format, "mp3_44100_96");
    assert_eq!(config.tts.voice_settings.stability, 0.3);
    assert_eq!(config.tts.voice_settings.similarity_boost, 0.7);
    assert_eq!(config.tts.voice_settings.style, 0.4);
    assert!(config.tts.voice_settings.use_speaker_boost);
    assert_eq!(config.tts.voice_settings.speed, 1.0);
    assert_eq!(config.tts.retry_count, 3);
    assert_eq!(config.tts.rate_limit, Some(60));

    assert_eq!(config.storage.audio_dir, PathBuf::from("output_voiceover"));
    assert_eq!(config.storage.database_path, PathBuf::from("output_db").join("quest_voiceover.db"));
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test the category URL
#[test]
fn test_categoryUrl_shouldJoinBaseAndPath() {
    let mut config = Config::default();
    config.wiki.base_url = "https://wiki.example/".to_string();

    assert_eq!(config.wiki.category_url(), "https://wiki.example/w/Category:Quest_transcript");
    assert_eq!(config.wiki.absolute_url("https://other.example/x"), "https://other.example/x");
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.wiki.base_url = "ftp://wiki.example".to_string();
    assert!(config.validate().is_err());
    config.wiki.base_url = "".to_string();
    assert!(config.validate().is_err());
    config.wiki.base_url = "https://wiki.example".to_string();

    config.wiki.site_name = " ".to_string();
    assert!(config.validate().is_err());
    config.wiki.site_name = "OSRS".to_string();

    config.wiki.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.wiki.timeout_secs = 30;

    config.tts.voice_settings.stability = 1.5;
    assert!(config.validate().is_err());
    config.tts.voice_settings.stability = 0.5;

    config.tts.voice_settings.speed = 0.0;
    assert!(config.validate().is_err());
    config.tts.voice_settings.speed = 1.0;

    config.tts.rate_limit = Some(0);
    assert!(config.validate().is_err());
    config.tts.rate_limit = None;

    assert!(config.validate().is_ok());
}

/// Test that the API key is only required on demand
#[test]
fn test_requireApiKey_withEmptyKey_shouldReturnError() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    let error = config.require_api_key().unwrap_err();
    assert!(error.to_string().contains("API key"));

    config.tts.api_key = "sk-test".to_string();
    assert!(config.require_api_key().is_ok());
}

/// Test that the retry count is bounded
#[test]
fn test_validate_withExcessiveRetryCount_shouldReturnError() {
    let mut config = Config::default();
    config.tts.retry_count = MAX_RETRY_COUNT;
    assert!(config.validate().is_ok());

    config.tts.retry_count = 1000;
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("retry count"));
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.wiki.site_name, "OSRS");
    Ok(())
}

/// Test that partial config files are completed with defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "wiki": { "site_name": "RS3" }, "tts": { "api_key": "abc" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.wiki.site_name, "RS3");
    assert_eq!(config.wiki.base_url, "https://oldschool.runescape.wiki");
    assert_eq!(config.tts.api_key, "abc");
    assert_eq!(config.tts.retry_count, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test save and reload
#[test]
fn test_save_thenLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    let mut config = Config::default();
    config.storage.audio_dir = PathBuf::from("clips");
    config.log_level = LogLevel::Trace;

    config.save(&path)?;
    let loaded = Config::load_or_create(&path)?;

    assert_eq!(loaded.storage.audio_dir, PathBuf::from("clips"));
    assert_eq!(loaded.log_level, LogLevel::Trace);
    Ok(())
}

/// Test log level mapping
#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
