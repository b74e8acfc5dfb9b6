use std::fmt::{self, Debug};

/// A callback invoked once per streamed token, in arrival order.
pub type TokenSink<'a> = Box<dyn FnMut(&str) + Send + 'a>;

/// Options for a single [`Client::send_message`](crate::Client::send_message)
/// call.
///
/// Overrides set here only apply to the call they are passed to. Fields
/// that are left unset fall back to the client's [`ClientConfig`]; an
/// explicit zero temperature or token count is sent as-is.
///
/// [`ClientConfig`]: crate::ClientConfig
#[derive(Default)]
pub struct CallOptions<'a> {
    pub(crate) system_prompt: Option<String>,
    pub(crate) new_conversation: bool,
    pub(crate) stream: bool,
    pub(crate) on_token: Option<TokenSink<'a>>,
    pub(crate) model: Option<String>,
    pub(crate) temperature: Option<f64>,
    pub(crate) max_tokens: Option<u32>,
}

impl<'a> CallOptions<'a> {
    /// Creates options that continue the current conversation without
    /// streaming.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the system prompt.
    ///
    /// The prompt only takes effect when the transcript is reset, i.e. for
    /// a new conversation or when the transcript is empty.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Discards the current transcript before sending.
    #[inline]
    pub fn new_conversation(mut self) -> Self {
        self.new_conversation = true;
        self
    }

    /// Requests a streamed response.
    #[inline]
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Attaches a callback that receives each token of a streamed response.
    ///
    /// The callback runs inside the decoding loop, so it should return
    /// quickly.
    #[inline]
    pub fn on_token(mut self, on_token: impl FnMut(&str) + Send + 'a) -> Self {
        self.on_token = Some(Box::new(on_token));
        self
    }

    /// Overrides the model for this call.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the temperature for this call.
    #[inline]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overrides the maximum number of generated tokens for this call.
    #[inline]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl Debug for CallOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("system_prompt", &self.system_prompt)
            .field("new_conversation", &self.new_conversation)
            .field("stream", &self.stream)
            .field("on_token", &self.on_token.as_ref().map(|_| "<callback>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
