use crate::filter::SearchExpr;
use crate::source::{FetchError, PageQuery, PageResponse, SortSpec};
use crate::table::presentation::LoadFlags;
use log::{debug, warn};

/// What the current result set is filtered and sorted by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub filters: Vec<SearchExpr>,
    pub search: String,
    pub sort: Option<SortSpec>,
}

/// A fetch the owner should run. The generation comes back with the result.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub generation: u64,
    pub query: PageQuery,
}

/// Rows accumulated so far plus the pagination flags the table renders from.
///
/// Every criteria change bumps `generation`; results carrying an older
/// generation belong to a superseded query and are dropped.
#[derive(Debug)]
pub struct Feed<T> {
    rows: Vec<T>,
    page: usize,
    page_size: usize,
    has_more: bool,
    loading: bool,
    is_loading_more: bool,
    total: usize,
    generation: u64,
    criteria: Criteria,
    last_error: Option<FetchError>,
}

impl<T> Feed<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
            loading: false,
            is_loading_more: false,
            total: 0,
            generation: 0,
            criteria: Criteria::default(),
            last_error: None,
        }
    }

    /// Start over from page 1 with new criteria.
    pub fn reset(&mut self, criteria: Criteria) -> PageRequest {
        self.generation += 1;
        self.criteria = criteria;
        self.rows.clear();
        self.page = 0;
        self.total = 0;
        self.has_more = true;
        self.loading = true;
        self.is_loading_more = false;
        self.last_error = None;
        debug!("feed reset, generation {}", self.generation);
        self.request(1)
    }

    /// Request the page after the last loaded one, unless a fetch is in flight
    /// or the source reported the end.
    pub fn next(&mut self) -> Option<PageRequest> {
        if !self.has_more || self.loading || self.is_loading_more {
            return None;
        }
        self.is_loading_more = true;
        Some(self.request(self.page + 1))
    }

    /// Apply a fetch result. Returns false when it was stale and ignored.
    pub fn settle(
        &mut self,
        generation: u64,
        result: Result<PageResponse<T>, FetchError>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "dropping result of generation {generation}, current is {}",
                self.generation
            );
            return false;
        }
        self.loading = false;
        self.is_loading_more = false;
        match result {
            Ok(resp) => {
                self.rows.extend(resp.data);
                self.page = resp.page;
                self.total = resp.total;
                self.has_more = resp.page < resp.total_page;
                self.last_error = None;
            }
            Err(e) => {
                warn!("page {} failed: {e}", self.page + 1);
                self.last_error = Some(e);
            }
        }
        true
    }

    pub fn flags(&self) -> LoadFlags {
        LoadFlags {
            loading: self.loading,
            has_more: self.has_more,
            is_loading_more: self.is_loading_more,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    fn request(&self, page: usize) -> PageRequest {
        PageRequest {
            generation: self.generation,
            query: PageQuery {
                page,
                page_size: self.page_size,
                filters: self.criteria.filters.clone(),
                search: self.criteria.search.clone(),
                sort: self.criteria.sort.clone(),
            },
        }
    }
}
