// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

/// Rejection carried through warp's filter chain; `handle_rejection` renders
/// it as `{"error": message}` with the attached status.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
