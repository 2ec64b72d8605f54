use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server error: status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            429 => ApiError::RateLimited,
            code => ApiError::ServerError {
                status: code,
                body: Self::truncate_body(body),
            },
        }
    }

    /// True when the server answered with a non-200 status.
    /// Everything else is a transport or body failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ServerError { .. } | ApiError::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_server_error() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            ApiError::ServerError { status, ref body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            _ => panic!("expected ServerError, got {:?}", err),
        }
        assert!(err.is_server_error());
    }

    #[test]
    fn test_from_status_non_error_codes_are_server_errors() {
        // A 204 or a redirect that was not followed is still not a catalog.
        let err = ApiError::from_status(StatusCode::NO_CONTENT, "");
        assert!(matches!(err, ApiError::ServerError { status: 204, .. }));
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "missing");
        assert!(matches!(err, ApiError::ServerError { status: 404, .. }));
    }

    #[test]
    fn test_from_status_rate_limited() {
        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ApiError::RateLimited));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_invalid_response_is_not_server_error() {
        assert!(!ApiError::InvalidResponse("bad json".into()).is_server_error());
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("({} total bytes)", long.len())));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated"));
    }
}
