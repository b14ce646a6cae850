/*!
 * Tests for translation backend implementations
 */

use ipetrans::providers::mock::{MockBackend, MOCK_TRANSLATION_PREFIX};
use ipetrans::providers::openai::OpenAI;
use ipetrans::providers::{Backend, ChatRequest};

fn request(units: Vec<(&str, &str)>) -> ChatRequest {
    ChatRequest {
        system_prompt: "You are a translator.".to_string(),
        user_prompt: "Translate the following.".to_string(),
        units: units
            .into_iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect(),
    }
}

/// Test that the working mock replies with every identifier in the batch
#[tokio::test]
async fn test_mock_chat_withWorkingBehavior_shouldCoverAllUnits() {
    let backend = MockBackend::working();
    let reply = backend
        .chat(&request(vec![
            ("TRANSLATE_ab12cd34", "Kürzeste Wege"),
            ("TRANSLATE_ef56ab78", "Laufzeit"),
        ]))
        .await
        .unwrap();

    assert!(reply.contains("TRANSLATE_ab12cd34"));
    assert!(reply.contains("TRANSLATE_ef56ab78"));
    assert!(reply.contains(MOCK_TRANSLATION_PREFIX));
}

/// Test that the failing mock reports an API error
#[tokio::test]
async fn test_mock_chat_withFailingBehavior_shouldReturnError() {
    let backend = MockBackend::failing();
    let result = backend.chat(&request(vec![("TRANSLATE_ab12cd34", "text")])).await;
    assert!(result.is_err());
}

/// Test the connection probe of both mock behaviors
#[tokio::test]
async fn test_mock_test_connection_shouldFollowBehavior() {
    assert!(MockBackend::working().test_connection().await.is_ok());
    assert!(MockBackend::failing().test_connection().await.is_err());
}

/// Test that only the mock backend is flagged as offline
#[test]
fn test_is_offline_shouldDistinguishBackends() {
    let mock = MockBackend::working();
    let openai = OpenAI::new("sk-test", "", "gpt-4o", 0.0, 30).unwrap();

    assert!(mock.is_offline());
    assert!(!openai.is_offline());
    assert_eq!(mock.name(), "Mock");
    assert_eq!(openai.name(), "OpenAI");
}

/// Test that client construction surfaces a Result instead of a silent
/// fallback client
#[test]
fn test_openai_new_withConfiguredTimeout_shouldBuild() {
    assert!(OpenAI::new("sk-test", "", "gpt-4o", 0.0, 30).is_ok());
    assert!(OpenAI::new("sk-test", "https://proxy.local", "gpt-4o", 0.7, 1).is_ok());
}
