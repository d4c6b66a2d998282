use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A product as returned by the backend search endpoint.
///
/// There is no identity field; a product is addressed by its position in a
/// result list or by a hash of its name and info URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub struct Product {
    pub name: String,
    pub thumbnail_url: String,
    #[ts(type = "number")]
    pub price: u64,
    pub info_url: String,
}

/// Body of `POST /api/summary`, forwarded upstream as-is.
///
/// `price` travels as text because that is what the analysis backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SummaryRequest {
    pub name: String,
    pub thumbnail_url: String,
    pub price: String,
    pub info_url: String,
}

impl From<&Product> for SummaryRequest {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            thumbnail_url: product.thumbnail_url.clone(),
            price: product.price.to_string(),
            info_url: product.info_url.clone(),
        }
    }
}
