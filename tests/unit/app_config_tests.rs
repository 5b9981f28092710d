/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use srtai::app_config::{BackendKind, Config, LogLevel};
use crate::common;

/// Test loading a full configuration file
#[test]
fn test_loadFromFile_withFullConfig_shouldReadEverySection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "srtai.json", r#"{
        "job": {
            "target_language": "fr",
            "model_id": "claude-test",
            "region": "eu-west-1",
            "batch_size": 10,
            "concurrency": 2,
            "retries": 5
        },
        "backend": {
            "provider": "anthropic",
            "api_key": "sk-test",
            "timeout_secs": 30
        },
        "log_level": "debug"
    }"#)?;

    let config = Config::load_from_file(&path)?;

    assert_eq!(config.job.target_language, "fr");
    assert_eq!(config.job.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.job.batch_size, 10);
    assert_eq!(config.job.retries, 5);
    assert_eq!(config.job.retry_backoff_ms, 500);
    assert_eq!(config.backend.provider, BackendKind::Anthropic);
    assert_eq!(config.backend.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Debug);
    config.validate()?;
    Ok(())
}

/// Test that an empty object yields the defaults
#[test]
fn test_loadFromFile_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "srtai.json", "{}")?;

    let config = Config::load_from_file(&path)?;

    assert_eq!(config, Config::default());
    assert_eq!(config.backend.provider, BackendKind::Ollama);
    Ok(())
}

/// Test that broken JSON is reported with the file name
#[test]
fn test_loadFromFile_withInvalidJson_shouldFailWithPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    let error = Config::load_from_file(&path).unwrap_err();

    assert!(format!("{:#}", error).contains("broken.json"));
    Ok(())
}

/// Test that a missing model is accepted only for dry runs
#[test]
fn test_validate_withDryRunAndNoModel_shouldPass() {
    let mut config = Config::default();
    assert!(config.validate().is_err());

    config.job.dry_run = true;
    assert!(config.validate().is_ok());
}

/// Test that zero concurrency is rejected before any work
#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.job.model_id = "llama3".to_string();
    config.job.concurrency = 0;
    assert!(config.validate().is_err());
}

/// Test that log levels map onto log filters
#[test]
fn test_logLevel_intoLevelFilter_shouldMatch() {
    assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
}
