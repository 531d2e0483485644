//! Response envelopes and error mapping.
//!
//! Every response carries `ok`. Failures are `{ok: false, error}` with:
//! - 400 for validation failures, malformed JSON and reputation auth errors
//! - 429 when the client is over its rate limit
//! - 500 for storage failures (detail logged, not returned)

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::assessment::AssessmentError;
use crate::storage::StorageError;

/// Successful envelope: `{ok: true, ...body}`.
#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    ok: bool,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> ApiOk<T> {
    pub fn json(body: T) -> Json<Self> {
        Json(Self { ok: true, body })
    }
}

/// Body-less acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Serialize)]
pub struct Imported {
    pub imported: usize,
}

#[derive(Debug, Serialize)]
pub struct Removed {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: &'a str,
}

/// Handler failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("Internal storage error")]
    Storage(#[source] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AssessmentError> for ApiError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::Storage(e) => ApiError::Storage(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Storage(e) = &self {
            tracing::error!(error = %e, "Storage failure");
        }
        let message = self.to_string();
        (status, Json(ErrorBody { ok: false, error: &message })).into_response()
    }
}
