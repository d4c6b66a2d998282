use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::product::Product;

/// Review analysis produced by the backend for a single product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct AnalysisResult {
    pub summary: String,
    pub positive_features: String,
    pub negative_features: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub pdf_url: Option<String>,
}

/// The two shapes the analysis backend is known to answer with.
///
/// Resolved once where the response enters the client so that nothing
/// downstream has to sniff for an `analysis` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Wrapped { analysis: AnalysisResult },
    Flat(AnalysisResult),
}

impl AnalysisPayload {
    pub fn into_analysis(self) -> AnalysisResult {
        match self {
            Self::Wrapped { analysis } => analysis,
            Self::Flat(analysis) => analysis,
        }
    }
}

impl From<AnalysisPayload> for AnalysisResult {
    fn from(payload: AnalysisPayload) -> Self {
        payload.into_analysis()
    }
}

/// A product merged with its completed analysis, handed from the list view
/// to the detail view through the session cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct CachedProductDetail {
    pub name: String,
    pub thumbnail_url: String,
    #[ts(type = "number")]
    pub price: u64,
    pub analysis: AnalysisResult,
}

impl CachedProductDetail {
    pub fn new(product: &Product, analysis: AnalysisResult) -> Self {
        Self {
            name: product.name.clone(),
            thumbnail_url: product.thumbnail_url.clone(),
            price: product.price,
            analysis,
        }
    }
}
