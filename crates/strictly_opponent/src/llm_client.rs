//! Remote move suggestions from a chat-completion service.
//!
//! Every failure on this path is expected: a missing credential, a network
//! error, a timeout, a non-2xx status, an unexpected body, or text with no
//! usable move all collapse to "no suggestion" plus a diagnostic note.

use crate::config::LlmConfig;
use crate::extract::extract_move;
use crate::prompt::{build_prompt, system_prompt};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strictly_minimax::{Board, Player};
use tracing::{debug, info, instrument, warn};

/// A candidate move from the remote service, validated only against
/// emptiness on the board it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    position: Option<usize>,
    raw_response: Option<String>,
    note: Option<String>,
}

impl Suggestion {
    fn disabled() -> Self {
        Self {
            position: None,
            raw_response: None,
            note: Some("no credential configured".to_string()),
        }
    }

    fn failed(error: &LlmError) -> Self {
        Self {
            position: None,
            raw_response: None,
            note: Some(error.message.clone()),
        }
    }

    fn from_response(raw: String, position: Option<usize>) -> Self {
        let note = position
            .is_none()
            .then(|| "response contained no legal move".to_string());
        Self {
            position,
            raw_response: Some(raw),
            note,
        }
    }

    /// The suggested square, if the response named an empty one.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The model's text, when a response was received.
    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    /// Why no move was produced, for diagnostics.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Client for one chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(model = %config.model(), enabled = config.is_enabled()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Asks for a move for `mark` and returns it if it names an empty square.
    pub async fn request_move(&self, board: &Board, mark: Player) -> Option<usize> {
        self.suggest(board, mark).await.position()
    }

    /// Asks for a move for `mark`, keeping the raw text and any failure note.
    ///
    /// Issues at most one request, bounded by the configured timeout.
    /// Never fails: errors become a suggestion without a position.
    #[instrument(skip(self, board), fields(board = %board.to_compact(), model = %self.config.model()))]
    pub async fn suggest(&self, board: &Board, mark: Player) -> Suggestion {
        let Some(api_key) = self.config.credential() else {
            info!("No credential configured; skipping remote suggestion");
            return Suggestion::disabled();
        };

        info!("Querying model for a move");
        let text = match self
            .complete(api_key, &system_prompt(mark), &build_prompt(board, mark))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Remote suggestion failed");
                return Suggestion::failed(&e);
            }
        };

        debug!(response = %text.trim(), "Model response");
        let position = extract_move(&text, board);
        if position.is_none() {
            warn!("Model response contained no legal move");
        }
        Suggestion::from_response(text, position)
    }

    /// Sends one chat-completion request and returns the message content.
    #[instrument(skip(self, api_key, system_prompt, user_message))]
    async fn complete(
        &self,
        api_key: &str,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: self.config.model(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: 0.0,
        };

        debug!(endpoint = %self.config.service_endpoint(), "Sending chat completion request");
        let response = self
            .http
            .post(self.config.service_endpoint())
            .bearer_auth(api_key)
            .timeout(*self.config.request_timeout())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::new(format!(
                        "Request timed out after {:?}",
                        self.config.request_timeout()
                    ))
                } else {
                    LlmError::new(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| LlmError::new(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            debug!(status = %status, response = %response_text, "Chat completion API error");
            return Err(LlmError::new(format!(
                "API error {}: {}",
                status, response_text
            )));
        }

        debug!(response_length = response_text.len(), "Parsing chat completion response");
        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| LlmError::new(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::new("No content in chat completion response".to_string()))?;

        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
