//! Forwards review-analysis requests to the backend.

use models::SummaryRequest;
use serde_json::Value;
use tracing::{info, warn};

use super::{backend_api::BackendClient, proxy_error::ProxyError};

const SUMMARY_FAILED: &str = "failed to fetch summary from backend";

#[derive(Debug, Clone)]
pub struct SummaryProxy {
    backend: BackendClient,
}

impl SummaryProxy {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Validate `input` and request an analysis for it.
    ///
    /// The backend body is returned unmodified; it may be a flat analysis or
    /// an `{ "analysis": ... }` wrapper.
    pub async fn summarize(&self, input: &Value) -> Result<Value, ProxyError> {
        let request = parse_summary_request(input)?;

        let analysis = self
            .backend
            .request_summary(&request)
            .await
            .map_err(|e| ProxyError::from_backend(e, SUMMARY_FAILED))
            .inspect_err(|e| {
                warn!(name = %request.name, error = %e.diagnostic(), "Summary proxy failed");
            })?;

        info!(name = %request.name, "Summary completed");
        Ok(analysis)
    }
}

/// Check that all four product fields are present and truthy.
///
/// Strings must be non-empty and numbers non-zero. Numbers are accepted for
/// any field and forwarded in their textual form, which is how `price`
/// usually arrives. Booleans, arrays and objects have no textual form for the
/// backend and are reported as missing, even though they are truthy in JSON.
pub fn parse_summary_request(input: &Value) -> Result<SummaryRequest, ProxyError> {
    let Value::Object(fields) = input else {
        return Err(ProxyError::InvalidInput(
            "request body must be a JSON object".to_string(),
        ));
    };

    let mut missing = Vec::new();
    let mut field = |key: &'static str| {
        let value = fields.get(key).and_then(truthy_text);
        if value.is_none() {
            missing.push(key);
        }
        value.unwrap_or_default()
    };

    let request = SummaryRequest {
        name: field("name"),
        thumbnail_url: field("thumbnail_url"),
        price: field("price"),
        info_url: field("info_url"),
    };

    if !missing.is_empty() {
        return Err(ProxyError::InvalidInput(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    Ok(request)
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
