//! Detail screen for one analyzed product, read back from the session cache.

use std::fmt::Write as _;

use models::CachedProductDetail;
use thiserror::Error;
use tracing::debug;
use utils::text::format_price;

use crate::session_cache::{CacheKey, SessionCacheError, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("product information not found, select it from the product list again")]
    NotFound,
    #[error("product information is incomplete, go back and select it again")]
    Malformed,
    #[error("no PDF report is available for this product")]
    PdfUnavailable,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    key: CacheKey,
    detail: CachedProductDetail,
}

impl DetailView {
    /// Load the entry stored under `key`.
    ///
    /// A missing entry is [`DetailError::NotFound`]; an entry without a
    /// usable `analysis` is [`DetailError::Malformed`].
    pub fn load(store: &impl SessionStore, key: &CacheKey) -> Result<Self, DetailError> {
        match store.read_detail(key) {
            Ok(detail) => Ok(Self {
                key: key.clone(),
                detail,
            }),
            Err(SessionCacheError::NotFound(_)) => Err(DetailError::NotFound),
            Err(e) => {
                debug!(key = %key, error = %e, "Cached product detail is unusable");
                Err(DetailError::Malformed)
            }
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn detail(&self) -> &CachedProductDetail {
        &self.detail
    }

    /// Where "download PDF" should send the user.
    pub fn pdf_url(&self) -> Result<&str, DetailError> {
        self.detail
            .analysis
            .pdf_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(DetailError::PdfUnavailable)
    }

    pub fn render(&self) -> String {
        let detail = &self.detail;
        let analysis = &detail.analysis;
        let mut out = String::new();

        let _ = writeln!(out, "{}", detail.name);
        let _ = writeln!(out, "{} 원", format_price(detail.price));
        let _ = writeln!(out, "image: {}", detail.thumbnail_url);
        let _ = writeln!(out);
        let _ = writeln!(out, "[summary]\n{}\n", analysis.summary);
        let _ = writeln!(out, "[positive]\n{}\n", analysis.positive_features);
        let _ = writeln!(out, "[negative]\n{}\n", analysis.negative_features);
        let _ = writeln!(out, "[keywords]\n{}", analysis.keywords.join(" · "));
        out
    }
}
