/*!
 * Tests for backend construction and the mock backend
 */

use std::sync::Arc;
use srtai::app_config::{BackendConfig, BackendKind};
use srtai::providers::mock::MockBackend;
use srtai::providers::ollama::Ollama;
use srtai::providers::{create_backend, Backend};
use srtai::translation::TranslationPromptBuilder;

/// Test that the factory builds the requested backend
#[test]
fn test_createBackend_withAnthropicKey_shouldBuildAnthropic() {
    let config = BackendConfig {
        provider: BackendKind::Anthropic,
        api_key: Some("sk-test".to_string()),
        ..BackendConfig::default()
    };

    let backend = create_backend(&config).unwrap();
    assert_eq!(backend.name(), "anthropic");
}

/// Test that a blank key is treated as missing
#[test]
fn test_createBackend_withBlankAnthropicKey_shouldFail() {
    let config = BackendConfig {
        provider: BackendKind::Anthropic,
        api_key: Some("   ".to_string()),
        ..BackendConfig::default()
    };

    assert!(create_backend(&config).is_err());
}

/// Test that the mock works behind the trait object
#[tokio::test]
async fn test_mockBackend_asTraitObject_shouldAnswerPayload() {
    let mock = MockBackend::working();
    let backend: Arc<dyn Backend> = Arc::new(mock.clone());
    let payload = TranslationPromptBuilder::new("it")
        .build_payload(&["Good morning".to_string()])
        .unwrap();

    let raw = backend.invoke("m", None, &payload).await.unwrap();

    assert!(raw.contains("[TRANSLATED] Good morning"));
    assert_eq!(mock.call_count(), 1);
}

/// Test that an unreachable server surfaces as an error, not a panic
#[tokio::test]
async fn test_ollama_withUnreachableServer_shouldReturnError() {
    let backend = Ollama::new(Some("http://127.0.0.1:9".to_string()), 2);
    let payload = TranslationPromptBuilder::new("es")
        .build_payload(&["Hello".to_string()])
        .unwrap();

    let result = backend.invoke("llama3", None, &payload).await;
    assert!(result.is_err());
}
