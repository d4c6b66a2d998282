//! Selecting a product: fetch its analysis, cache it, navigate to the detail screen.

use std::sync::Arc;

use dashmap::DashSet;
use models::{CachedProductDetail, Product};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    Route,
    api_client::{ApiClientError, ProductApi},
    session_cache::{CacheKey, CacheKeyStrategy, SessionCacheError, SessionStore},
};

#[derive(Debug, Error)]
pub enum AnalysisFlowError {
    #[error("analysis for this product is already in progress")]
    AlreadyLoading,
    #[error("failed to load product information")]
    Request(#[source] ApiClientError),
    #[error("failed to store product information")]
    Cache(#[from] SessionCacheError),
}

/// Drives the per-product "analyze" action.
///
/// Loading is tracked per product, so a pending analysis only blocks a
/// second request for the same item, even when another product maps to the
/// same cache key. Nothing is retried; the user selects
/// the item again.
pub struct AnalysisRequestFlow<S> {
    api: Arc<dyn ProductApi>,
    cache: S,
    strategy: CacheKeyStrategy,
    loading: DashSet<Product>,
}

impl<S: SessionStore> AnalysisRequestFlow<S> {
    pub fn new(api: Arc<dyn ProductApi>, cache: S, strategy: CacheKeyStrategy) -> Self {
        Self {
            api,
            cache,
            strategy,
            loading: DashSet::new(),
        }
    }

    pub fn key_for(&self, page_index: usize, product: &Product) -> CacheKey {
        self.strategy.key_for(page_index, product)
    }

    pub fn is_loading(&self, product: &Product) -> bool {
        self.loading.contains(product)
    }

    /// Analyze the product shown at `page_index` on the current page.
    ///
    /// On success the detail is cached and the route to its detail screen is
    /// returned. On failure nothing is cached and no navigation happens.
    pub async fn select(
        &self,
        page_index: usize,
        product: &Product,
    ) -> Result<Route, AnalysisFlowError> {
        let key = self.key_for(page_index, product);
        if !self.loading.insert(product.clone()) {
            return Err(AnalysisFlowError::AlreadyLoading);
        }
        let _loading = LoadingGuard {
            set: &self.loading,
            product,
        };

        let analysis = self.api.summarize(product).await.map_err(|e| {
            warn!(key = %key, name = %product.name, error = %e, "Analysis request failed");
            AnalysisFlowError::Request(e)
        })?;

        let detail = CachedProductDetail::new(product, analysis);
        self.cache.write_detail(&key, &detail)?;
        info!(key = %key, name = %product.name, "Cached product analysis");

        Ok(Route::Detail(key))
    }
}

struct LoadingGuard<'a> {
    set: &'a DashSet<Product>,
    product: &'a Product,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(self.product);
    }
}
