//! Tab-scoped key/value store handing analysis results from the list to the
//! detail screen.
//!
//! A [`SessionCache`] lives exactly as long as the client session that owns
//! it. There is no TTL and no eviction; a write replaces whatever was stored
//! under the same key. Clones share the same entries, separate instances never
//! do.

use std::{fmt, str::FromStr, sync::Arc};

use clap::ValueEnum;
use dashmap::DashMap;
use models::{CachedProductDetail, Product};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

const KEY_PREFIX: &str = "product_";

/// Identifier a cached detail is stored and looked up under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn storage_key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CacheKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// How a selected product is turned into a [`CacheKey`].
///
/// `PageIndex` keys by position on the currently rendered page, so a re-sort
/// or a new search can make an old key point at a different product.
/// `ContentHash` keys by product content and survives both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CacheKeyStrategy {
    #[default]
    PageIndex,
    ContentHash,
}

impl CacheKeyStrategy {
    pub fn key_for(&self, page_index: usize, product: &Product) -> CacheKey {
        match self {
            CacheKeyStrategy::PageIndex => CacheKey::new(page_index.to_string()),
            CacheKeyStrategy::ContentHash => {
                let mut hasher = Sha256::new();
                hasher.update(product.name.as_bytes());
                hasher.update(b"\n");
                hasher.update(product.info_url.as_bytes());
                CacheKey::new(format!("{:x}", hasher.finalize()))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionCacheError {
    #[error("no entry stored under `{0}`")]
    NotFound(CacheKey),
    #[error("entry under `{key}` is not a product detail: {message}")]
    Malformed { key: CacheKey, message: String },
    #[error("failed to serialize entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Raw session storage: `write` overwrites, `read` returns `None` when absent.
pub trait SessionStore: Send + Sync {
    fn write(&self, key: &CacheKey, value: Value);

    fn read(&self, key: &CacheKey) -> Option<Value>;

    fn write_detail(
        &self,
        key: &CacheKey,
        detail: &CachedProductDetail,
    ) -> Result<(), SessionCacheError> {
        self.write(key, serde_json::to_value(detail)?);
        Ok(())
    }

    fn read_detail(&self, key: &CacheKey) -> Result<CachedProductDetail, SessionCacheError> {
        let value = self
            .read(key)
            .ok_or_else(|| SessionCacheError::NotFound(key.clone()))?;
        serde_json::from_value(value).map_err(|e| SessionCacheError::Malformed {
            key: key.clone(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: Arc<DashMap<String, Value>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for SessionCache {
    fn write(&self, key: &CacheKey, value: Value) {
        self.entries.insert(key.storage_key(), value);
    }

    fn read(&self, key: &CacheKey) -> Option<Value> {
        self.entries
            .get(&key.storage_key())
            .map(|entry| entry.value().clone())
    }
}
