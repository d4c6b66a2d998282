//! Error taxonomy shared by the search and summary proxies.

use thiserror::Error;

use super::backend_api::BackendApiError;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Caller-supplied data failed a precondition; the backend was not contacted.
    #[error("{0}")]
    InvalidInput(String),
    /// The backend could not be reached (transport failure or timeout).
    #[error("{message}")]
    UpstreamUnavailable {
        message: &'static str,
        cause: BackendApiError,
    },
    /// The backend answered with a non-success status.
    #[error("backend error ({status}): {detail}")]
    UpstreamError { status: u16, detail: String },
    /// The backend answered 2xx with a body we could not use.
    #[error("{message}")]
    InvalidResponse {
        message: &'static str,
        detail: String,
    },
}

impl ProxyError {
    /// Map a raw backend failure, using `message` as the generic client-facing text.
    pub fn from_backend(err: BackendApiError, message: &'static str) -> Self {
        match err {
            BackendApiError::Http { status, body } => {
                let detail = if body.trim().is_empty() {
                    reqwest::StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("no response body")
                        .to_string()
                } else {
                    body
                };
                ProxyError::UpstreamError { status, detail }
            }
            BackendApiError::Serde(detail) => ProxyError::InvalidResponse { message, detail },
            cause @ (BackendApiError::Transport(_)
            | BackendApiError::Timeout
            | BackendApiError::InvalidUrl(_)) => ProxyError::UpstreamUnavailable { message, cause },
        }
    }

    /// HTTP status the API layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::InvalidInput(_) => 400,
            ProxyError::UpstreamUnavailable { .. } => 500,
            ProxyError::UpstreamError { .. } => 502,
            ProxyError::InvalidResponse { .. } => 500,
        }
    }

    /// Full diagnostic text for logs, including what the client never sees.
    pub fn diagnostic(&self) -> String {
        match self {
            ProxyError::UpstreamUnavailable { message, cause } => format!("{message}: {cause}"),
            ProxyError::InvalidResponse { message, detail } => format!("{message}: {detail}"),
            other => other.to_string(),
        }
    }
}
