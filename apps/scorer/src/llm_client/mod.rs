/// LLM Client — the single point of entry for all Claude API calls in the
/// scorer.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// The client makes exactly one attempt per call. The bounded rate-limit
/// retry belongs to the evaluation layer, which owns the cooldown clock;
/// callers inspect `LlmError::is_rate_limit` to decide.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in the scorer.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
/// Upper bound on response length: one JSON object with ten short fields.
const MAX_TOKENS: u32 = 1000;
/// Near-deterministic sampling so repeated runs score consistently.
const TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Whether this failure is the service pushing back on request rate.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            LlmError::Api { status, message } => {
                *status == 429 || message.to_lowercase().contains("rate_limit")
            }
            _ => false,
        }
    }
}

/// The completion boundary the evaluation layer calls through.
///
/// One production implementation (`LlmClient`); tests substitute scripted
/// fakes. This is a test seam, not a provider abstraction — the wire types
/// stay Anthropic-shaped.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Sends one prompt and returns the response content normalized to a
    /// single string.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: MessageContent,
    usage: Usage,
}

/// The API's `content` field arrives either as a bare text block or as a
/// sequence of blocks. `normalize` is the only place that distinction
/// exists; everything downstream sees one string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Block(ContentBlock),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    fn normalize(self) -> String {
        let blocks = match self {
            MessageContent::Block(block) => vec![block],
            MessageContent::Blocks(blocks) => blocks,
        };
        blocks
            .into_iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The production Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionApi for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        let text = parsed.content.normalize();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted completion backend: pops one canned outcome per call and
    /// records every prompt it was sent.
    pub struct ScriptedApi {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn rate_limit_error() -> LlmError {
            LlmError::Api {
                status: 429,
                message: "rate_limit_error: too many requests".to_string(),
            }
        }

        pub fn server_error() -> LlmError {
            LlmError::Api {
                status: 500,
                message: "internal server error".to_string(),
            }
        }
    }

    #[async_trait]
    impl CompletionApi for ScriptedApi {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("ScriptedApi ran out of responses")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_block_sequence() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "text", "text": "world"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.normalize(), "Hello, world");
    }

    #[test]
    fn test_normalize_single_block() {
        let json = r#"{
            "content": {"type": "text", "text": "just one block"},
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.normalize(), "just one block");
    }

    #[test]
    fn test_normalize_skips_non_text_blocks() {
        let json = r#"{
            "content": [
                {"type": "thinking"},
                {"type": "text", "text": "answer"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.normalize(), "answer");
    }

    #[test]
    fn test_is_rate_limit_on_429() {
        let err = LlmError::Api {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_is_rate_limit_on_message_marker() {
        let err = LlmError::Api {
            status: 529,
            message: "overloaded: RATE_LIMIT exceeded".to_string(),
        };
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_other_errors_are_not_rate_limits() {
        let err = LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_rate_limit());
        assert!(!LlmError::EmptyContent.is_rate_limit());
    }
}
