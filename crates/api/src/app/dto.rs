use serde::Deserialize;

/// Query string of `GET /quoters`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub content: Option<String>,
}

/// Body of `POST /sales`: the quoter being sold.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub id: String,
}
