//! A conversation client for locally hosted, OpenAI-compatible model
//! servers such as LM Studio.
//!
//! [`Client`] keeps the transcript of one conversation and sends it to the
//! server on every call, either waiting for the complete answer or decoding
//! the streamed tokens as they arrive.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub mod conversation;
mod error;
mod io;
mod options;
mod proto;

use std::fmt::{self, Display};

use mime::Mime;
use reqwest::{Response, StatusCode, header};
use serde_json::Value;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use conversation::{Message, Role};
use conversation::Transcript;
pub use error::{Error, Result};
use io::{Chunks, Sse};
pub use options::{CallOptions, TokenSink};
use proto::{ChatCompletion, ChatCompletionRequest, ModelList};

/// The outcome of [`Client::check_connection`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionStatus {
    /// Whether the server answered.
    pub connected: bool,
    /// A human-readable description, naming the loaded model or the reason
    /// of the failure.
    pub message: String,
}

impl Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A client that holds one conversation with the model server.
///
/// Calls must be serialized: every method that touches the transcript takes
/// `&mut self`.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
    transcript: Transcript,
}

impl Client {
    /// Creates a new `Client` with the given configuration.
    #[inline]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            transcript: Transcript::default(),
        }
    }

    /// Returns the configuration the client was created with.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the messages of the current conversation, oldest first.
    #[inline]
    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Discards the current conversation.
    #[inline]
    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    /// Sends a user message and returns the assistant's answer.
    ///
    /// The transcript is reset first when `options` asks for a new
    /// conversation or when it's empty; the system prompt of `options` is
    /// only used in that case. The user message stays in the transcript even
    /// if the call fails, and the answer is appended on success.
    pub async fn send_message(
        &mut self,
        content: &str,
        mut options: CallOptions<'_>,
    ) -> Result<String> {
        if content.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }

        if options.new_conversation || self.transcript.is_empty() {
            self.transcript.reset(options.system_prompt.as_deref());
        } else if options.system_prompt.is_some() {
            warn!("conversation in progress, ignoring the system prompt");
        }
        self.transcript.push_user(content);

        let mut on_token = options.on_token.take();
        let body = proto::create_request(
            self.transcript.messages(),
            &options,
            &self.config,
        );
        let resp = self.post_chat_completion(&body).await?;
        let text = if body.stream {
            read_stream(resp, |token| {
                if let Some(on_token) = on_token.as_mut() {
                    on_token(token);
                }
            })
            .await?
        } else {
            read_completion(resp).await?
        };

        self.transcript.push_assistant(text.clone());
        Ok(text)
    }

    /// Checks whether the server is reachable and which model it serves.
    ///
    /// This never fails, failures are reported in the returned status.
    pub async fn check_connection(&self) -> ConnectionStatus {
        match self.fetch_models().await {
            Ok(models) => {
                let model = models.data.into_iter().next().and_then(|m| m.id);
                let message = match model {
                    Some(model) => format!("Connected! Active model: {model}"),
                    None => "Connected! No model loaded".to_owned(),
                };
                ConnectionStatus {
                    connected: true,
                    message,
                }
            }
            Err(reason) => {
                debug!("connection check failed: {reason}");
                ConnectionStatus {
                    connected: false,
                    message: format!(
                        "Connection failed ({reason}). Is the model server \
                         running at {}?",
                        self.config.base_url
                    ),
                }
            }
        }
    }

    async fn post_chat_completion(
        &self,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<Response> {
        trace!("sending request: {body:?}");

        let mut req = self
            .http
            .post(self.config.endpoint("/chat/completions"))
            .timeout(self.config.request_timeout)
            .header(header::CONTENT_TYPE, "application/json");
        if body.stream {
            req = req.header(header::ACCEPT, "text/event-stream");
        }
        let resp = req
            .json(body)
            .send()
            .await
            .map_err(|err| Error::transport(&err))?;
        debug!("chat completion returned {}", resp.status());

        let status = resp.status();
        if !status.is_success() {
            // The body is only a hint, failing to read it is fine.
            let body = resp.json::<Value>().await.ok();
            return Err(Error::from_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                body,
            ));
        }
        Ok(resp)
    }

    async fn fetch_models(&self) -> std::result::Result<ModelList, String> {
        let resp = self
            .http
            .get(self.config.endpoint("/models"))
            .timeout(self.config.connection_check_timeout)
            .send()
            .await
            .map_err(|err| error::describe(&err))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("status: {status}"));
        }
        resp.json::<ModelList>()
            .await
            .map_err(|err| error::describe(&err))
    }
}

async fn read_completion(resp: Response) -> Result<String> {
    let bytes = resp.bytes().await.map_err(|err| Error::transport(&err))?;
    let body = serde_json::from_slice::<Value>(&bytes).map_err(|err| {
        Error::Transport(format!("invalid response body: {err}"))
    })?;
    serde_json::from_value::<ChatCompletion>(body)
        .ok()
        .and_then(ChatCompletion::into_content)
        .ok_or_else(|| {
            Error::api(
                "invalid response format: choices[0].message.content is \
                 missing or not a string",
            )
        })
}

async fn read_stream(
    resp: Response,
    on_token: impl FnMut(&str),
) -> Result<String> {
    let status = resp.status();
    if status == StatusCode::NO_CONTENT || resp.content_length() == Some(0) {
        return Err(Error::Api {
            status: Some(status.as_u16()),
            message: "streaming response has no body".to_owned(),
            detail: None,
        });
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let is_event_stream = content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| m.subtype().as_str() == "event-stream")
        .unwrap_or(false);
    if !is_event_stream {
        // Some servers don't label the stream, decode it anyway.
        warn!("unexpected content type for a stream: {content_type:?}");
    }

    let sse = Sse::new(Chunks::from_response(resp));
    sse.collect_tokens(on_token).await
}
