use axum::{
    Router, body::Bytes, extract::State, response::Json as ResponseJson, routing::post,
};
use serde_json::Value;
use services::services::proxy_error::ProxyError;

use crate::{AppState, error::ApiError};

/// POST /api/summary
/// Request a review analysis for one product
///
/// The body is parsed by hand so that a malformed payload is reported as a
/// 400 with the usual `{ "error" }` shape instead of axum's rejection text.
pub async fn request_summary(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ResponseJson<Value>, ApiError> {
    let input: Value = serde_json::from_slice(&body)
        .map_err(|_| ProxyError::InvalidInput("request body must be a JSON object".to_string()))?;

    let analysis = state.summary.summarize(&input).await?;
    Ok(ResponseJson(analysis))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/summary", post(request_summary))
}
