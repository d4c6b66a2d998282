pub mod analysis;
pub mod product;
pub mod search;

pub use analysis::{AnalysisPayload, AnalysisResult, CachedProductDetail};
pub use product::{Product, SummaryRequest};
pub use search::{ErrorBody, SearchResponse, SortOrder};
