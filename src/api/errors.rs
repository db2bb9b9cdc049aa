use thiserror::Error;

/// Message used when an OTP is rejected without a backend explanation.
pub const INVALID_OTP_MESSAGE: &str = "Invalid or expired OTP";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Missing or malformed input, raised before any request is sent.
    #[error("{0}")]
    Validation(String),
    /// Non-2xx response. `message` holds the backend `error`/`message` field.
    #[error("{}", request_message(.status, .message.as_deref()))]
    Request {
        status: u16,
        message: Option<String>,
    },
    #[error("Could not load: {0}")]
    Network(String),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
    #[error("A previous submission is still pending")]
    Busy,
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Status code of a request error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message provided by the backend, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Request { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn request_message(status: &u16, message: Option<&str>) -> String {
    message.map_or_else(|| format!("HTTP {status}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn request_error_prefers_backend_message() {
        let err = ClientError::Request {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.backend_message(), Some("Invalid credentials"));
    }

    #[test]
    fn request_error_falls_back_to_status() {
        let err = ClientError::Request {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_not_found());
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = ClientError::validation("Start date is required.");
        assert_eq!(err.to_string(), "Start date is required.");
    }
}
