use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use models::ErrorBody;
use services::services::proxy_error::ProxyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Proxy(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
