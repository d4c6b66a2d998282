use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

/// GET /api/search?keyword=<keyword>
/// Proxy a keyword search to the backend
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseJson<Value>, ApiError> {
    let keyword = query.keyword.unwrap_or_default();
    let results = state.search.search(&keyword).await?;
    Ok(ResponseJson(json!({ "results": results })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search_products))
}
