//! HTTP client for the product search / review analysis backend.

use std::time::Duration;

use models::SummaryRequest;
use reqwest::{Client, Response, header};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

const SEARCH_PATH: &str = "naver/products";
const SUMMARY_PATH: &str = "review/summary";

#[derive(Debug, Clone, Error)]
pub enum BackendApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

/// Backend API client
///
/// Every call is a single request; nothing is retried and nothing is cached.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

    /// Create a client rooted at `base_url`, e.g. `http://backend:8000`
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, BackendApiError> {
        if base_url.cannot_be_a_base() {
            return Err(BackendApiError::InvalidUrl(base_url.to_string()));
        }
        // Url::join drops the last path segment unless it ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("review-lens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendApiError::Transport(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET {base}/naver/products?query=<keyword>` with response caching disabled
    pub async fn search_products(&self, keyword: &str) -> Result<Value, BackendApiError> {
        let url = self.endpoint(SEARCH_PATH)?;
        debug!(%url, keyword, "Forwarding product search");

        let res = self
            .http
            .get(url)
            .query(&[("query", keyword)])
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        read_json(res).await
    }

    /// `POST {base}/review/summary` with the product fields as JSON
    pub async fn request_summary(&self, request: &SummaryRequest) -> Result<Value, BackendApiError> {
        let url = self.endpoint(SUMMARY_PATH)?;
        debug!(%url, name = %request.name, "Forwarding summary request");

        let res = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        read_json(res).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendApiError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendApiError::InvalidUrl(e.to_string()))
    }
}

async fn read_json(res: Response) -> Result<Value, BackendApiError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(BackendApiError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = res.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|e| BackendApiError::Serde(e.to_string()))
}

fn map_reqwest_error(e: reqwest::Error) -> BackendApiError {
    if e.is_timeout() {
        BackendApiError::Timeout
    } else {
        BackendApiError::Transport(e.to_string())
    }
}
