//! Typed client for the `/api/search` and `/api/summary` routes.

use std::time::Duration;

use async_trait::async_trait;
use models::{AnalysisPayload, AnalysisResult, ErrorBody, Product, SearchResponse, SummaryRequest};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

const GENERIC_FAILURE: &str = "something went wrong, please try again";

#[derive(Debug, Clone, Error)]
pub enum ApiClientError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("json error: {0}")]
    Serde(String),
}

impl ApiClientError {
    /// Text suitable for showing to the user.
    ///
    /// Input errors (4xx) carry the server's explanation; everything else
    /// collapses into one generic message and the detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status, message } if (400..500).contains(status) => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// What the list and detail screens need from the server
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiClientError>;

    async fn summarize(&self, product: &Product) -> Result<AnalysisResult, ApiClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: Url,
}

impl HttpApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("review/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiClientError::Transport(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiClientError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ProductApi for HttpApiClient {
    async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiClientError> {
        let res = self
            .http
            .get(self.endpoint("/api/search")?)
            .query(&[("keyword", keyword)])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let body: SearchResponse = read_json(res).await?;
        Ok(body.results)
    }

    async fn summarize(&self, product: &Product) -> Result<AnalysisResult, ApiClientError> {
        let res = self
            .http
            .post(self.endpoint("/api/summary")?)
            .json(&SummaryRequest::from(product))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let payload: AnalysisPayload = read_json(res).await?;
        Ok(payload.into_analysis())
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ApiClientError> {
    let status = res.status();
    let bytes = res.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        return Err(ApiClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiClientError::Serde(e.to_string()))
}

fn map_reqwest_error(e: reqwest::Error) -> ApiClientError {
    if e.is_timeout() {
        ApiClientError::Timeout
    } else {
        ApiClientError::Transport(e.to_string())
    }
}
