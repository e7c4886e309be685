use axum::Router;

pub mod quoters;
pub mod sales;
pub mod system;

/// Router for every versioned endpoint (nested under `/api/v1`).
pub fn router() -> Router {
    Router::new()
        .nest("/quoters", quoters::router())
        .nest("/sales", sales::router())
}
