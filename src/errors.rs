use crate::store::StoreError;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Every way a browse request can end other than success.
///
/// Converted to a response exactly once, at the top of request handling.
/// Only `NotFound` and `RangeNotSatisfiable` reach the client as themselves;
/// everything else becomes a bare 500 with the detail left in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no object or listing matches")]
    NotFound,

    #[error("range not satisfiable for object of {size} bytes")]
    RangeNotSatisfiable { size: u64 },

    #[error("object store unavailable: {0}")]
    UpstreamUnavailable(#[from] StoreError),

    #[error("listing of `{prefix}` exceeds {limit} keys")]
    ListingTruncated { prefix: String, limit: usize },

    #[error("listing render failed: {0}")]
    Render(#[from] tera::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "file not found").into_response(),
            AppError::RangeNotSatisfiable { size } => {
                let mut response = StatusCode::RANGE_NOT_SATISFIABLE.into_response();
                let headers = response.headers_mut();
                headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
                if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
                response
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
        }
    }
}
