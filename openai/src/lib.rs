//! Chat-completions client.
//!
//! The bot performs exactly one blocking (non-streaming) request per
//! invocation, with a fixed low temperature. The reply text is returned
//! opaque; classification happens in `fixbot-core`.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fixbot_core::CompletionPrompt;

/// Errors from the completion service. All fatal; the bot never retries.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network/transport failure or response-decoding failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no choices at all.
    #[error("completion API returned no content")]
    NoContent,

    /// The API key contains bytes that cannot go into a header.
    #[error("invalid completion API key")]
    InvalidApiKey,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    /// `null` when the model produced nothing; treated as an empty reply.
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    /// Creates a client against `base_url` (`https://api.openai.com/v1`
    /// outside of tests).
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Sends one completion request and returns the reply text.
    ///
    /// An empty string is a valid reply and is returned as such; a response
    /// with no choices is [`CompletionError::NoContent`].
    pub async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, CompletionError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| CompletionError::InvalidApiKey)?,
        );

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, "requesting completion");
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: ChatResponse = response.json().await?;
        if parsed.choices.is_empty() {
            return Err(CompletionError::NoContent);
        }
        let reply = parsed.choices.remove(0).message.content.unwrap_or_default();
        tracing::debug!(chars = reply.chars().count(), "received completion reply");
        Ok(reply)
    }
}
