//! Search state: keyword, raw results, sort order and pagination.

use models::{Product, SortOrder};
use thiserror::Error;
use tracing::{debug, warn};
use utils::text::normalize_keyword;

use crate::api_client::{ApiClientError, ProductApi};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("keyword required")]
    KeywordRequired,
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// Issued by [`ResultsController::begin_search`]; only the most recent
/// ticket may apply its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    keyword: String,
}

impl SearchTicket {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

#[derive(Debug, Clone)]
pub struct ResultsController {
    keyword: String,
    results: Vec<Product>,
    sorted: Vec<Product>,
    sort_order: SortOrder,
    page: usize,
    page_size: usize,
    status: SearchStatus,
    error: Option<String>,
    latest_seq: u64,
}

impl Default for ResultsController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResultsController {
    pub fn new(page_size: usize) -> Self {
        Self {
            keyword: String::new(),
            results: Vec::new(),
            sorted: Vec::new(),
            sort_order: SortOrder::None,
            page: 1,
            page_size: page_size.max(1),
            status: SearchStatus::Idle,
            error: None,
            latest_seq: 0,
        }
    }

    /// Run a full search: validate, call the API, apply the outcome.
    pub async fn search(&mut self, api: &dyn ProductApi, keyword: &str) -> Result<(), SearchError> {
        let ticket = self.begin_search(keyword)?;
        let outcome = api.search(ticket.keyword()).await;
        self.apply_search(&ticket, outcome);

        match (self.status, &self.error) {
            (SearchStatus::Failed, Some(message)) => Err(SearchError::Failed(message.clone())),
            _ => Ok(()),
        }
    }

    /// Move to `Searching` and hand out a ticket for the request.
    ///
    /// Any ticket issued earlier becomes stale, including when the new
    /// keyword is rejected.
    pub fn begin_search(&mut self, keyword: &str) -> Result<SearchTicket, SearchError> {
        self.latest_seq += 1;

        let Some(keyword) = normalize_keyword(keyword) else {
            self.status = SearchStatus::Failed;
            self.error = Some(SearchError::KeywordRequired.to_string());
            return Err(SearchError::KeywordRequired);
        };

        self.keyword = keyword.to_string();
        self.status = SearchStatus::Searching;
        self.error = None;

        Ok(SearchTicket {
            seq: self.latest_seq,
            keyword: self.keyword.clone(),
        })
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Returns `false` and leaves the state untouched when a newer search has
    /// been started since the ticket was issued.
    pub fn apply_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Product>, ApiClientError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(
                keyword = %ticket.keyword,
                "Discarding results of a superseded search"
            );
            return false;
        }

        match outcome {
            Ok(results) => {
                debug!(keyword = %ticket.keyword, count = results.len(), "Search succeeded");
                self.results = results;
                self.status = SearchStatus::Succeeded;
                self.error = None;
                self.page = 1;
            }
            Err(e) => {
                warn!(keyword = %ticket.keyword, error = %e, "Search failed");
                self.results.clear();
                self.status = SearchStatus::Failed;
                self.error = Some(e.user_message());
            }
        }
        self.resort();
        true
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.resort();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn total_pages(&self) -> usize {
        self.sorted.len().div_ceil(self.page_size).max(1)
    }

    /// Products on the current page
    pub fn visible(&self) -> &[Product] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.sorted.len());
        self.sorted.get(start..end).unwrap_or_default()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn sorted_results(&self) -> &[Product] {
        &self.sorted
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn resort(&mut self) {
        let mut sorted = self.results.clone();
        // sort_by is stable, so equal prices keep backend order
        match self.sort_order {
            SortOrder::None => {}
            SortOrder::PriceAsc => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        self.sorted = sorted;
        self.set_page(self.page);
    }
}
