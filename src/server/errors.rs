//! JSON error responses.
//!
//! Every failure leaves the server as `{"error": ...}`. Validation failures
//! carry the field -> message map, internal failures only a generic message.

use crate::catalogue_store::CatalogueError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

pub const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const INTERNAL_MESSAGE: &str =
    "the server encountered a problem and could not process your request";
const BUSY_MESSAGE: &str = "the catalogue is busy, please retry the request";

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn bad_json(rejection: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

pub fn bad_query(rejection: QueryRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// Known path, unsupported verb.
pub async fn method_not_allowed(method: Method) -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("the {} method is not supported for this resource", method),
    )
}

/// Seconds a client should wait before retrying a busy catalogue.
const RETRY_AFTER_SECS: &str = "1";

impl IntoResponse for CatalogueError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let mut response = match self {
            CatalogueError::NotFound(message) => error_response(StatusCode::NOT_FOUND, &message),
            CatalogueError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": errors })),
            )
                .into_response(),
            CatalogueError::ConstraintViolation(message) => {
                error_response(StatusCode::CONFLICT, &message)
            }
            CatalogueError::Timeout(detail) => {
                warn!("Catalogue operation timed out: {}", detail);
                error_response(StatusCode::SERVICE_UNAVAILABLE, BUSY_MESSAGE)
            }
            CatalogueError::Internal(err) => {
                error!("Internal catalogue error: {:#}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        };
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}
