//! Response envelope shared by every route.
//!
//! # Invariants
//! - Bodies are always `{"payload": ...}`.
//! - Failures carry `{"error": true, "message": ...}` as the payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use quotes_core::{Quote, QuoteServiceError};
use serde::Serialize;

/// Success payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Quote(Quote),
    Quotes(Vec<Quote>),
    /// Serialized as `null`; used for a random sample of an empty store.
    Empty,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    payload: T,
}

/// Gateway response with explicit success and failure branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Success { status: StatusCode, payload: Payload },
    Failure { status: StatusCode, message: String },
}

impl ApiResponse {
    pub fn ok(payload: Payload) -> Self {
        Self::Success {
            status: StatusCode::OK,
            payload,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Failure {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }
}

impl From<QuoteServiceError> for ApiResponse {
    fn from(value: QuoteServiceError) -> Self {
        warn!("event=request_rejected module=http status=error error={value}");
        Self::bad_request(value.to_string())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Success { status, payload } => {
                (status, Json(Envelope { payload })).into_response()
            }
            Self::Failure { status, message } => {
                let payload = ErrorBody {
                    error: true,
                    message: &message,
                };
                (status, Json(Envelope { payload })).into_response()
            }
        }
    }
}
