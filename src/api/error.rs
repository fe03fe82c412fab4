//! API error taxonomy
//!
//! Failures surfaced by the request client, split the way callers react to
//! them: transport failures, non-success statuses, undecodable bodies.

use serde_json::Value;
use std::fmt;

/// Error produced by [`StudyApi`](super::StudyApi) calls.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The host was unreachable or the connection failed mid-request.
    /// Never retried by the client; the caller decides what to do.
    Network(String),
    /// The server answered with a non-success status.
    Status {
        status: u16,
        /// Server-provided `message` field when present, generic fallback
        /// otherwise.
        message: String,
        /// Raw error body, when it parsed as JSON.
        body: Option<Value>,
    },
    /// A success response whose body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Build a status error from a raw response body.
    pub(crate) fn from_status(status: u16, raw: &str) -> Self {
        let body: Option<Value> = serde_json::from_str(raw).ok();
        let message = body
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| generic_message(status));
        Self::Status {
            status,
            message,
            body,
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Authorization failure that survived (or never entered) the refresh
    /// path. Callers typically clear credentials and route to login.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// A 4xx other than 401, usually a validation message to show verbatim.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(s) if (400..500).contains(&s) && s != 401)
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
    }
}

fn generic_message(status: u16) -> String {
    match status {
        401 => "Your session has expired, please sign in again".to_string(),
        s if s >= 500 => "StudyNest is having trouble right now, try again later".to_string(),
        s => format!("Request failed with status {}", s),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network error: {}", e),
            Self::Status {
                status, message, ..
            } => write!(f, "{} ({})", message, status),
            Self::Decode(e) => write!(f, "unexpected response shape: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_uses_server_message() {
        let err = ApiError::from_status(400, r#"{"message":"Email already registered"}"#);
        match &err {
            ApiError::Status {
                status,
                message,
                body,
            } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Email already registered");
                assert!(body.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_client_error());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn status_error_falls_back_on_unparseable_body() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>");
        match &err {
            ApiError::Status { message, body, .. } => {
                assert_eq!(message, "StudyNest is having trouble right now, try again later");
                assert!(body.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_server_error());
    }

    #[test]
    fn unauthorized_is_not_a_plain_client_error() {
        let err = ApiError::from_status(401, "");
        assert!(err.is_unauthorized());
        assert!(!err.is_client_error());
        assert_eq!(err.status(), Some(401));
    }
}
