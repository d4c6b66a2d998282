use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::product::Product;

/// Body of a successful `GET /api/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Product>,
}

/// Body of every non-success response from the `/api` routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Ordering applied to a result list before pagination
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Backend order
    #[default]
    None,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::None, SortOrder::PriceAsc, SortOrder::PriceDesc];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::None => "default (search order)",
            SortOrder::PriceAsc => "price: low to high",
            SortOrder::PriceDesc => "price: high to low",
        }
    }
}
