use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
const DEFAULT_MODEL: &str = "local-model";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECTION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    request_timeout: Option<Duration>,
    connection_check_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Creates a builder with every field left to its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom base URL, e.g. `http://localhost:1234/v1`.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the default model.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the default sampling temperature.
    #[inline]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the default maximum number of generated tokens.
    #[inline]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the hard timeout of a chat completion request, including the
    /// time spent reading a streamed body.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the timeout of the connection check.
    #[inline]
    pub fn with_connection_check_timeout(mut self, timeout: Duration) -> Self {
        self.connection_check_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ClientConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            request_timeout: self
                .request_timeout
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            connection_check_timeout: self
                .connection_check_timeout
                .unwrap_or(DEFAULT_CONNECTION_CHECK_TIMEOUT),
        }
    }
}

/// Configuration for [`Client`](crate::Client).
///
/// The configuration is immutable once built. Per-call overrides go through
/// [`CallOptions`](crate::CallOptions) instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) temperature: f64,
    pub(crate) max_tokens: u32,
    pub(crate) request_timeout: Duration,
    pub(crate) connection_check_timeout: Duration,
}

impl ClientConfig {
    /// Returns the base URL, without a trailing slash.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default model.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the default temperature.
    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns the default maximum number of generated tokens.
    #[inline]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[inline]
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    #[inline]
    fn default() -> Self {
        ClientConfigBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:1234/v1");
        assert_eq!(config.model(), "local-model");
        assert_eq!(config.temperature(), 0.7);
        assert_eq!(config.max_tokens(), 4096);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.connection_check_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_explicit_values() {
        let config = ClientConfigBuilder::new()
            .with_base_url("http://127.0.0.1:8080/v1/")
            .with_model("qwen")
            .with_temperature(0.0)
            .with_max_tokens(0)
            .build();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1");
        assert_eq!(
            config.endpoint("/models"),
            "http://127.0.0.1:8080/v1/models"
        );
        assert_eq!(config.model(), "qwen");
        assert_eq!(config.temperature(), 0.0);
        assert_eq!(config.max_tokens(), 0);
    }
}
