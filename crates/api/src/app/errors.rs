use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use quotedesk_infra::ServiceError;

/// Map a service failure to a client response.
///
/// The cause is logged; the client only sees a generic message. Conflicts
/// are the only failure with their own status, everything else is a 400.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    tracing::error!(error = %err, "request failed");
    match err {
        ServiceError::Conflict(_) => json_error(
            StatusCode::CONFLICT,
            "sale_related",
            "quoter is already part of a sale",
        ),
        ServiceError::NotFound => json_error(StatusCode::BAD_REQUEST, "not_found", "quoter not found"),
        ServiceError::Connection(_) => {
            json_error(StatusCode::BAD_REQUEST, "connection_error", "storage unavailable")
        }
        ServiceError::Insertion(_) => json_error(StatusCode::BAD_REQUEST, "insertion_error", "write rejected"),
        ServiceError::Publish(_) => json_error(StatusCode::BAD_REQUEST, "publish_error", "event stream unavailable"),
        ServiceError::InvalidQuery(_) => json_error(StatusCode::BAD_REQUEST, "invalid_query", "invalid search content"),
        ServiceError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid identifier"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
