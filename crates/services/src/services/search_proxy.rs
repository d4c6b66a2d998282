//! Forwards keyword searches to the backend and normalizes the answer.

use serde_json::Value;
use tracing::{info, warn};
use utils::text::normalize_keyword;

use super::{backend_api::BackendClient, proxy_error::ProxyError};

pub const KEYWORD_REQUIRED: &str = "keyword is required";
const SEARCH_FAILED: &str = "failed to fetch products";

#[derive(Debug, Clone)]
pub struct SearchProxy {
    backend: BackendClient,
}

impl SearchProxy {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Search the backend for `keyword`.
    ///
    /// Items are returned exactly as the backend sent them. A missing or
    /// `null` `items` field is an empty result, not an error.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Value>, ProxyError> {
        let keyword = normalize_keyword(keyword)
            .ok_or_else(|| ProxyError::InvalidInput(KEYWORD_REQUIRED.to_string()))?;

        let body = self
            .backend
            .search_products(keyword)
            .await
            .map_err(|e| ProxyError::from_backend(e, SEARCH_FAILED))
            .inspect_err(|e| {
                warn!(keyword, error = %e.diagnostic(), "Product search proxy failed");
            })?;

        let items = extract_items(body)?;
        info!(keyword, count = items.len(), "Product search completed");
        Ok(items)
    }
}

fn extract_items(body: Value) -> Result<Vec<Value>, ProxyError> {
    let Value::Object(mut map) = body else {
        return Err(ProxyError::InvalidResponse {
            message: SEARCH_FAILED,
            detail: "search response is not a JSON object".to_string(),
        });
    };

    match map.remove("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ProxyError::InvalidResponse {
            message: SEARCH_FAILED,
            detail: format!("`items` is not an array: {other}"),
        }),
    }
}
