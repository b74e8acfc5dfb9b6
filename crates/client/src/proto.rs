use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::Message;
use crate::{CallOptions, ClientConfig};

// ------------------------------
// Types received from the server
// ------------------------------

/// A non-streamed chat completion.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CompletionChoice {
    pub message: Option<CompletionMessage>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CompletionMessage {
    // Kept loose so that a non-string content is reported as a malformed
    // response rather than a decoding failure.
    pub content: Option<Value>,
}

impl ChatCompletion {
    /// Takes the text of the first choice, if it's a string.
    #[inline]
    pub fn into_content(self) -> Option<String> {
        let choice = self.choices.into_iter().next()?;
        match choice.message?.content? {
            Value::String(content) => Some(content),
            _ => None,
        }
    }
}

/// A chunk of a streamed chat completion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChunkChoice {
    pub delta: Option<Delta>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Takes the content delta of the first choice.
    #[inline]
    pub fn into_token(self) -> Option<String> {
        self.choices.into_iter().next()?.delta?.content
    }
}

/// The response of `GET /models`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ModelEntry {
    pub id: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
    pub messages: &'a [Message],
}

// -----------
// Conversions
// -----------

/// Resolves per-call overrides against the configured defaults. Only an
/// absent override falls back to the default.
#[inline]
pub fn create_request<'a>(
    messages: &'a [Message],
    options: &'a CallOptions<'_>,
    config: &'a ClientConfig,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: options.model.as_deref().unwrap_or(&config.model),
        temperature: options.temperature.unwrap_or(config.temperature),
        max_tokens: options.max_tokens.unwrap_or(config.max_tokens),
        stream: options.stream,
        messages,
    }
}
