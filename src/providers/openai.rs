use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{Backend, ChatRequest};

/// OpenAI client for the chat completions API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// The model to use
    model: String,
    /// Temperature for generation
    temperature: f32,
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI message format
#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    /// Completion choices
    choices: Vec<OpenAIChoice>,
}

/// Individual choice in an OpenAI response
#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    /// The generated message
    message: OpenAIMessage,
}

impl OpenAI {
    /// Create a new OpenAI client. Fails if the HTTP client cannot be
    /// built, since a client without the configured timeout must not be
    /// used as a fallback.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
        })
    }

    fn api_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/chat/completions".to_string()
        } else {
            format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'))
        }
    }

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to OpenAI API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse OpenAI API response: {}", e)))
    }
}

#[async_trait]
impl Backend for OpenAI {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let api_request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
            temperature: Some(self.temperature),
        };

        let response = self.complete(api_request).await?;
        let reply = response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ProviderError::ParseError("OpenAI response contained no choices".to_string()))?;
        Ok(reply)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            temperature: None,
        };
        self.complete(request).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}
