//! API response helpers
//!
//! Every failed API interaction renders the same JSON envelope:
//! `{"status": <code>, "message": <text>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

/// Message on the fallback for unmatched routes
const NOT_FOUND_MESSAGE: &str = "Invalid request. Please check.";

/// Hold data for a failed API interaction
pub struct Error {
    status_code: StatusCode,
    message: String,
}

impl Error {
    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    status: u16,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorEnvelope {
                status: self.status_code.as_u16(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Fallback for requests to unregistered routes
pub async fn not_found() -> Error {
    Error::not_found(NOT_FOUND_MESSAGE)
}
