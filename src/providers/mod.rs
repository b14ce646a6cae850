/*!
 * Backend implementations for the translation service.
 *
 * This module contains the client implementations a batch can be sent to:
 * - OpenAI: OpenAI-compatible chat completions API
 * - Mock: deterministic offline backend for tests and debug runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One batch request to a translation backend.
///
/// The prompts are what a chat backend consumes; the structured units are
/// carried alongside so offline backends can produce a faithful reply
/// without re-parsing the prompt.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction for the model
    pub system_prompt: String,
    /// User payload listing each unit under its identifier
    pub user_prompt: String,
    /// The batch as (identifier, text) pairs
    pub units: Vec<(String, String)>,
}

/// Common trait for all translation backends
///
/// The reply is a single free-form text blob; callers must not assume it is
/// machine-parseable structure beyond embedded identifier lines.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Send one batch and return the raw reply text
    async fn chat(&self, request: &ChatRequest) -> Result<String, ProviderError>;

    /// Test the connection to the backend
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;

    /// True when the backend performs no network calls, in which case the
    /// inter-batch pacing delay is skipped
    fn is_offline(&self) -> bool {
        false
    }
}

pub mod mock;
pub mod openai;
