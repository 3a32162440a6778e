//! Page-oriented data fetching: the query/response contract and an
//! in-memory implementation with simulated latency.

use crate::filter::SearchExpr;
use crate::table::column::Record;
use futures::{FutureExt, future::BoxFuture};
use std::{
    cmp::Ordering,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
    time::Duration,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub order: SortOrder,
}

impl SortSpec {
    /// none -> ascending -> descending -> none, restarting on another column
    pub fn cycle(current: Option<&SortSpec>, key: &str) -> Option<SortSpec> {
        let order = match current {
            Some(s) if s.key == key => match s.order {
                SortOrder::Ascend => Some(SortOrder::Descend),
                SortOrder::Descend => None,
            },
            _ => Some(SortOrder::Ascend),
        };
        order.map(|order| SortSpec {
            key: key.to_string(),
            order,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub filters: Vec<SearchExpr>,
    pub search: String,
    pub sort: Option<SortSpec>,
}

#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_page: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid page request: {0}")]
    InvalidQuery(&'static str),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

pub trait DataSource<T>: Send + Sync {
    fn fetch(&self, query: PageQuery) -> BoxFuture<'static, Result<PageResponse<T>, FetchError>>;
}

/// Serves pages out of a fixed row set.
pub struct MemorySource<T> {
    rows: Arc<Vec<T>>,
    searchable: Arc<Vec<String>>,
    latency: Duration,
    fail_every: Option<u64>,
    requests: AtomicU64,
}

impl<T: Record + Clone> MemorySource<T> {
    /// `searchable` lists the field keys free-text search looks at.
    pub fn new(rows: Vec<T>, searchable: &[&str]) -> Self {
        Self {
            rows: Arc::new(rows),
            searchable: Arc::new(searchable.iter().map(|k| k.to_string()).collect()),
            latency: Duration::ZERO,
            fail_every: None,
            requests: AtomicU64::new(0),
        }
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every `n`th request fail, to exercise error paths.
    pub fn fail_every(mut self, n: u64) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }
}

impl<T: Record + Clone> DataSource<T> for MemorySource<T> {
    fn fetch(&self, query: PageQuery) -> BoxFuture<'static, Result<PageResponse<T>, FetchError>> {
        let request = self.requests.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        let fails = self.fail_every.is_some_and(|n| request % n == 0);
        let rows = Arc::clone(&self.rows);
        let searchable = Arc::clone(&self.searchable);
        let latency = self.latency;

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if fails {
                return Err(FetchError::Unavailable(format!(
                    "request #{request} timed out"
                )));
            }
            query_rows(&rows, &searchable, &query)
        }
        .boxed()
    }
}

pub fn query_rows<T: Record + Clone>(
    rows: &[T],
    searchable: &[String],
    query: &PageQuery,
) -> Result<PageResponse<T>, FetchError> {
    if query.page == 0 {
        return Err(FetchError::InvalidQuery("pages start at 1"));
    }
    if query.page_size == 0 {
        return Err(FetchError::InvalidQuery("page size must be positive"));
    }

    let words: Vec<String> = query
        .search
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    let mut matched: Vec<&T> = rows
        .iter()
        .filter(|row| {
            query
                .filters
                .iter()
                .all(|f| row.field(&f.key).is_some_and(|v| f.matches(&v)))
        })
        .filter(|row| {
            words.iter().all(|word| {
                searchable.iter().any(|key| {
                    row.field(key)
                        .is_some_and(|v| v.to_lowercase().contains(word.as_str()))
                })
            })
        })
        .collect();

    if let Some(sort) = &query.sort {
        matched.sort_by(|a, b| {
            let ord = compare_values(
                &a.field(&sort.key).unwrap_or_default(),
                &b.field(&sort.key).unwrap_or_default(),
            );
            match sort.order {
                SortOrder::Ascend => ord,
                SortOrder::Descend => ord.reverse(),
            }
        });
    }

    let total = matched.len();
    let start = (query.page - 1).saturating_mul(query.page_size);
    let data = matched
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    Ok(PageResponse {
        data,
        page: query.page,
        page_size: query.page_size,
        total_page: total.div_ceil(query.page_size),
        total,
    })
}

/// Numeric when both sides parse as numbers, lexical otherwise.
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse_query;
    use crate::table::column::tests::Fields;

    fn rows() -> Vec<Fields> {
        (1..=25)
            .map(|i| {
                Fields(vec![
                    ("id", i.to_string()),
                    ("name", format!("item {i:02}")),
                    ("status", if i % 2 == 0 { "even" } else { "odd" }.to_string()),
                ])
            })
            .collect()
    }

    fn query(page: usize, text: &str, sort: Option<SortSpec>) -> PageQuery {
        let parsed = parse_query(text);
        PageQuery {
            page,
            page_size: 10,
            filters: parsed.filters,
            search: parsed.search,
            sort,
        }
    }

    fn ids(resp: &PageResponse<Fields>) -> Vec<String> {
        resp.data.iter().map(|r| r.id()).collect()
    }

    fn searchable() -> Vec<String> {
        vec!["name".into(), "status".into()]
    }

    #[test]
    fn pages_and_totals() {
        let all = rows();
        let last = query_rows(&all, &searchable(), &query(3, "", None)).unwrap();
        assert_eq!(last.total, 25);
        assert_eq!(last.total_page, 3);
        assert_eq!(ids(&last), ["21", "22", "23", "24", "25"]);

        let beyond = query_rows(&all, &searchable(), &query(4, "", None)).unwrap();
        assert!(beyond.data.is_empty());
    }

    #[test]
    fn filters_and_search_combine() {
        let all = rows();
        let resp = query_rows(&all, &searchable(), &query(1, "status==even id>=20 item", None))
            .unwrap();
        assert_eq!(ids(&resp), ["20", "22", "24"]);
        assert_eq!(resp.total_page, 1);
    }

    #[test]
    fn unknown_filter_column_matches_nothing() {
        let all = rows();
        let resp = query_rows(&all, &searchable(), &query(1, "colour=red", None)).unwrap();
        assert_eq!(resp.total, 0);
        assert_eq!(resp.total_page, 0);
    }

    #[test]
    fn numeric_sort_descending() {
        let all = rows();
        let sort = Some(SortSpec {
            key: "id".into(),
            order: SortOrder::Descend,
        });
        let resp = query_rows(&all, &searchable(), &query(1, "", sort)).unwrap();
        assert_eq!(ids(&resp)[..3], ["25", "24", "23"]);
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = query_rows(&rows(), &searchable(), &query(0, "", None)).unwrap_err();
        assert!(matches!(err, FetchError::InvalidQuery(_)));
    }

    #[test]
    fn sort_cycles_per_column() {
        let asc = SortSpec::cycle(None, "a");
        assert_eq!(asc.as_ref().map(|s| s.order), Some(SortOrder::Ascend));
        let desc = SortSpec::cycle(asc.as_ref(), "a");
        assert_eq!(desc.as_ref().map(|s| s.order), Some(SortOrder::Descend));
        assert_eq!(SortSpec::cycle(desc.as_ref(), "a"), None);
        let other = SortSpec::cycle(desc.as_ref(), "b").unwrap();
        assert_eq!((other.key.as_str(), other.order), ("b", SortOrder::Ascend));
    }

    #[tokio::test]
    async fn memory_source_fails_on_schedule() {
        let source = MemorySource::new(rows(), &["name"]).fail_every(2);
        assert!(source.fetch(query(1, "", None)).await.is_ok());
        assert!(matches!(
            source.fetch(query(1, "", None)).await,
            Err(FetchError::Unavailable(_))
        ));
        let third = source.fetch(query(2, "", None)).await.unwrap();
        assert_eq!(third.page, 2);
        assert_eq!(third.data.len(), 10);
    }
}
