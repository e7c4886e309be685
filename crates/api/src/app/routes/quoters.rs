use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use quotedesk_core::QuoterId;
use quotedesk_infra::ServiceError;
use quotedesk_quoting::{Quoter, QuoterPatch};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_quoters).post(create_quoter))
        .route("/:id", get(get_quoter).patch(update_quoter))
}

/// Without `content` (or with an empty one) every quoter is listed;
/// otherwise the four-way content search runs.
pub async fn list_quoters(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SearchParams>,
) -> axum::response::Response {
    let result = match params.content.as_deref().filter(|c| !c.is_empty()) {
        Some(content) => services.queries.search_by_content(content).await,
        None => services.queries.list_all().await,
    };

    match result {
        Ok(quoters) => (StatusCode::OK, Json(quoters)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_quoter(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_quoter_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.queries.get(id).await {
        Ok(quoter) => (StatusCode::OK, Json(quoter)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_quoter(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Quoter>, JsonRejection>,
) -> axum::response::Response {
    let Json(quoter) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    match services.writes.insert_quoter(quoter).await {
        Ok(quoter) => (StatusCode::CREATED, Json(quoter)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_quoter(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<QuoterPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_quoter_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };

    match services.writes.update_quoter(id, patch).await {
        Ok(quoter) => (StatusCode::CREATED, Json(quoter)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub(crate) fn parse_quoter_id(raw: &str) -> Result<QuoterId, axum::response::Response> {
    raw.parse::<QuoterId>()
        .map_err(|e| errors::service_error_to_response(ServiceError::from(e)))
}

pub(crate) fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    tracing::error!(error = %rejection, "rejected request body");
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", "invalid request body")
}
