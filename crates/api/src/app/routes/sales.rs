use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::routes::quoters::{invalid_body, parse_quoter_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_sale))
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateSaleRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    let quoter_id = match parse_quoter_id(&body.id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.writes.create_sale(quoter_id).await {
        Ok(sale) => (StatusCode::CREATED, Json(sale)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
