/*!
 * Mock backend for testing and debug runs.
 *
 * The mock is deterministic: it tags every unit's original text with a debug
 * prefix and echoes it under the unit's identifier, so a full pipeline run
 * needs no network access. Failure modes can be simulated for tests:
 * - `MockBackend::working()` - always replies with tagged text
 * - `MockBackend::failing()` - always fails with an API error
 * - `MockBackend::working().with_custom_reply(...)` - arbitrary reply shape
 */

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{Backend, ChatRequest};

/// Prefix applied to every unit's text by the working mock
pub const MOCK_TRANSLATION_PREFIX: &str = "[DEBUG MOCK TRANSLATION] ";

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always replies with every identifier and tagged text
    Working,
    /// Always fails with an error
    Failing,
}

/// Mock backend for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Custom reply generator (optional)
    custom_reply: Option<fn(&ChatRequest) -> String>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            custom_reply: None,
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom reply generator
    pub fn with_custom_reply(mut self, generator: fn(&ChatRequest) -> String) -> Self {
        self.custom_reply = Some(generator);
        self
    }

    /// The deterministic reply for a batch: each identifier on its own line,
    /// followed by the tagged original text
    pub fn generate_reply(request: &ChatRequest) -> String {
        let mut reply = String::new();
        for (identifier, text) in &request.units {
            reply.push_str(identifier);
            reply.push('\n');
            reply.push_str(MOCK_TRANSLATION_PREFIX);
            reply.push_str(text);
            reply.push_str("\n\n");
        }
        reply
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        match self.behavior {
            MockBehavior::Working => {
                if let Some(generator) = self.custom_reply {
                    Ok(generator(request))
                } else {
                    Ok(Self::generate_reply(request))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated backend failure".to_string(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Working => Ok(()),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "Simulated connection failure".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }

    fn is_offline(&self) -> bool {
        true
    }
}
