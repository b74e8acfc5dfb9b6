use std::error::Error as StdError;

use serde_json::Value;

/// Error type for [`Client`](crate::Client).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message to send was empty.
    #[error("message content must not be empty")]
    EmptyMessage,

    /// The server answered with a non-success status, or with a body that
    /// doesn't have the expected shape.
    #[error("{message}")]
    Api {
        /// HTTP status code, if the failure is tied to one.
        status: Option<u16>,
        /// Human-readable description.
        message: String,
        /// The `error` object of the response body, if it could be parsed.
        detail: Option<Value>,
    },

    /// Any other failure while talking to the server: connection errors,
    /// timeouts, unreadable bodies.
    #[error("failed to send message: {0}")]
    Transport(String),
}

impl Error {
    pub(crate) fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn from_status(
        status: u16,
        reason: &str,
        body: Option<Value>,
    ) -> Self {
        let detail =
            body.and_then(|mut body| body.get_mut("error").map(Value::take));
        let mut message = format!("model server returned {status} {reason}");
        if let Some(text) = detail.as_ref().and_then(detail_message) {
            message.push_str(": ");
            message.push_str(text);
        }
        Self::Api {
            status: Some(status),
            message,
            detail,
        }
    }

    #[inline]
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Transport(describe(err))
    }

    /// Returns the HTTP status code for API errors.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the error detail the server sent, for API errors.
    #[inline]
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// Checks if this error comes from the model server.
    #[inline]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

// Servers usually send `{"error": {"message": "..."}}`, but some send the
// message as a plain string.
fn detail_message(detail: &Value) -> Option<&str> {
    detail
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| detail.as_str())
}

/// Builds a readable description of a `reqwest` error, including its causes.
pub(crate) fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "request timed out".to_owned();
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_error_with_detail() {
        let err = Error::from_status(
            500,
            "Internal Server Error",
            Some(json!({ "error": { "message": "boom" } })),
        );
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), Some(&json!({ "message": "boom" })));
        assert_eq!(
            err.to_string(),
            "model server returned 500 Internal Server Error: boom"
        );
    }

    #[test]
    fn test_status_error_without_body() {
        let err = Error::from_status(404, "Not Found", None);
        assert_eq!(err.status(), Some(404));
        assert!(err.detail().is_none());
        assert_eq!(err.to_string(), "model server returned 404 Not Found");

        let err = Error::from_status(
            400,
            "Bad Request",
            Some(json!({ "error": "bad model" })),
        );
        assert_eq!(
            err.to_string(),
            "model server returned 400 Bad Request: bad model"
        );
    }

    #[test]
    fn test_other_kinds() {
        let err = Error::api("malformed");
        assert!(err.is_api_error());
        assert_eq!(err.status(), None);

        let err = Error::Transport("connection refused".to_owned());
        assert!(!err.is_api_error());
        assert_eq!(
            err.to_string(),
            "failed to send message: connection refused"
        );
    }
}
