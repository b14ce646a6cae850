/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use anyhow::Result;

use crate::common;
use ipetrans::app_config::{Config, LogLevel, TranslationProvider};
use ipetrans::file_utils::FileManager;

/// Test that the default configuration passes validation
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.source_language, "de");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
}

/// Test that provider names parse case-insensitively
#[test]
fn test_provider_from_str_shouldParseKnownNames() {
    assert_eq!(TranslationProvider::from_str("openai").unwrap(), TranslationProvider::OpenAI);
    assert_eq!(TranslationProvider::from_str("Mock").unwrap(), TranslationProvider::Mock);
    assert!(TranslationProvider::from_str("anthropic").is_err());
}

/// Test display and lowercase forms of provider names
#[test]
fn test_provider_names_shouldBeConsistent() {
    assert_eq!(TranslationProvider::OpenAI.display_name(), "OpenAI");
    assert_eq!(TranslationProvider::Mock.to_lowercase_string(), "mock");
    assert_eq!(format!("{}", TranslationProvider::OpenAI), "openai");
}

/// Test that an explicit config key wins over the environment
#[test]
fn test_resolve_api_key_withConfigKey_shouldUseIt() {
    let mut config = Config::default();
    config.translation.api_key = "sk-test-key".to_string();
    assert_eq!(config.translation.resolve_api_key(), Some("sk-test-key".to_string()));
}

/// Test validation of the unit cap
#[test]
fn test_validate_withZeroMaxUnits_shouldFail() {
    let mut config = Config::default();
    config.translation.max_units = Some(0);
    assert!(config.validate().is_err());

    config.translation.max_units = Some(1);
    assert!(config.validate().is_ok());
}

/// Test validation of the sampling temperature range
#[test]
fn test_validate_withTemperatureOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.translation.temperature = 2.5;
    assert!(config.validate().is_err());
}

/// Test that empty language codes are rejected
#[test]
fn test_validate_withEmptyLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
}

/// Test that a config file written to disk loads back with the same values
#[test]
fn test_config_shouldRoundTripThroughConfigFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config.translation.batch_size = 7;
    config.log_level = LogLevel::Debug;

    FileManager::write_to_file(&config_path, &serde_json::to_string_pretty(&config)?)?;
    let loaded: Config = serde_json::from_str(&FileManager::read_to_string(&config_path)?)?;

    assert_eq!(loaded.translation.provider, TranslationProvider::Mock);
    assert_eq!(loaded.translation.batch_size, 7);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldCreateDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");
    assert!(!FileManager::file_exists(&config_path));

    let config = Config::load_or_create(&config_path)?;

    assert!(FileManager::file_exists(&config_path));
    assert_eq!(config.translation.batch_size, Config::default().translation.batch_size);

    // The created file must load back identically
    let reloaded = Config::load_or_create(&config_path)?;
    assert_eq!(reloaded.source_language, config.source_language);
    Ok(())
}

/// Test that an existing config file is loaded, not overwritten
#[test]
fn test_load_or_create_withExistingFile_shouldLoadIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.translation.batch_size = 42;
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        &serde_json::to_string_pretty(&config)?,
    )?;

    let loaded = Config::load_or_create(&config_path)?;
    assert_eq!(loaded.translation.batch_size, 42);
    Ok(())
}

/// Test that a malformed config file is an error, not silently replaced
#[test]
fn test_load_or_create_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path =
        common::create_test_file(&temp_dir.path().to_path_buf(), "conf.json", "{not json")?;

    assert!(Config::load_or_create(&config_path).is_err());
    // The broken file is left in place for inspection
    assert_eq!(FileManager::read_to_string(&config_path)?, "{not json");
    Ok(())
}

/// Test that providers serialize to lowercase JSON strings
#[test]
fn test_provider_shouldSerializeLowercase() -> Result<()> {
    let json = serde_json::to_string(&TranslationProvider::Mock)?;
    assert_eq!(json, "\"mock\"");
    let parsed: TranslationProvider = serde_json::from_str("\"openai\"")?;
    assert_eq!(parsed, TranslationProvider::OpenAI);
    Ok(())
}
