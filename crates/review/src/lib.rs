//! Terminal client for product search and review summaries.
//!
//! The modules mirror the screens of the web client: a search list driven by
//! [`results::ResultsController`], an [`analysis_flow::AnalysisRequestFlow`]
//! that fetches a summary for one selected product, a tab-scoped
//! [`session_cache::SessionCache`] that carries the result across, and the
//! [`detail::DetailView`] that renders it.

pub mod analysis_flow;
pub mod api_client;
pub mod detail;
pub mod results;
pub mod session_cache;

use session_cache::CacheKey;

/// Screens the client can navigate between
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    Detail(CacheKey),
}
