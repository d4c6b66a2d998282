use axum::Router;

use crate::AppState;

pub mod health;
pub mod search;
pub mod summary;

/// Routes mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(search::router())
        .merge(summary::router())
}
