//! Unwrap axum extractor results so malformed bodies, queries and paths
//! answer with the same JSON error shape as every other failure.
//!
//! ```ignore
//! async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., JsonApiError> {
//!     let input = extract_json(body)?;
//! }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;

use crate::errors::JsonApiError;

fn rejected(status: StatusCode, detail: String) -> JsonApiError {
    // Missing route params are a wiring bug, not bad input.
    if status.is_server_error() {
        JsonApiError::internal(detail)
    } else {
        JsonApiError::bad_request(detail)
    }
}

pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    result.map(|Json(v)| v).map_err(|e| rejected(e.status(), e.body_text()))
}

pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, JsonApiError> {
    result.map(|Query(v)| v).map_err(|e| rejected(e.status(), e.body_text()))
}

pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, JsonApiError> {
    result.map(|Path(v)| v).map_err(|e| rejected(e.status(), e.body_text()))
}
