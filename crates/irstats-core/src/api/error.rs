use thiserror::Error;

use super::RawResponse;

/// Why a login attempt did not produce a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("login response did not set a session cookie")]
    MissingSessionCookie,

    #[error("login request failed: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(AuthFailure),

    /// `response` holds the status and headers when the failure came while
    /// reading the body; its body is then empty.
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
        response: Option<RawResponse>,
    },

    #[error("Invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: RawResponse,
    },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - session cookie rejected")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True for failures that happened before or during login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::AuthenticationFailed(_) | ApiError::Unauthorized)
    }
}

/// Errors raised while building a [`Client`](super::Client).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid login path {0:?}: must start with '/'")]
    InvalidLoginPath(String),

    #[error("Invalid user agent {0:?}")]
    InvalidUserAgent(String),

    #[error("Invalid timeout: must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid proxy URL {url:?}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    #[error("Missing credentials: {0} must not be empty")]
    MissingCredentials(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    Transport(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(ref b) if b == "nope"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "gone"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        match ApiError::from_status(StatusCode::IM_A_TEAPOT, "tea") {
            ApiError::InvalidResponse(msg) => assert!(msg.contains("418") && msg.contains("tea")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_body() {
        let short = "x".repeat(MAX_ERROR_BODY_LENGTH);
        assert_eq!(ApiError::truncate_body(&short), short);

        let long = "y".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"y".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 520 total bytes)"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // 'é' is two bytes, so byte 500 falls mid-character
        let body = format!("a{}", "é".repeat(300));
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("... (truncated"));
    }

    #[test]
    fn test_auth_failure_display() {
        let err = ApiError::AuthenticationFailed(AuthFailure::MissingSessionCookie);
        assert_eq!(
            err.to_string(),
            "Authentication failed: login response did not set a session cookie"
        );
        assert!(err.is_auth_failure());
        assert!(!ApiError::RateLimited.is_auth_failure());
    }

    #[test]
    fn test_unauthorized_display() {
        assert_eq!(
            ApiError::Unauthorized.to_string(),
            "Unauthorized - session cookie rejected"
        );
    }
}
