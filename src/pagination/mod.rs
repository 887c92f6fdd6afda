//! Pagination handling for the Omada OpenAPI.
//!
//! Collections are paged by number (`page`, `pageSize`) and every page may
//! carry a `totalRows` hint. The hint is not reliable: it can be missing,
//! and it can change between pages. Fetching therefore stops when either
//!
//! - a page comes back empty, or
//! - the most recently reported `totalRows` has been reached.
//!
//! The empty-page rule guarantees termination even when `totalRows` never
//! arrives. Pages are read one after another with no snapshot isolation, so
//! records added or removed on the controller between two page requests can
//! be missed or seen twice. The result is a best-effort complete listing,
//! not a consistent one.

use crate::errors::OmadaResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use tracing::debug;

/// Page size requested when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Largest page size the controller accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// One page of a paged collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Total number of records in the collection, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,

    /// Page number of this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,

    /// Page size the controller applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_size: Option<u64>,

    /// Records on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
}

impl<T> Page<T> {
    /// Creates a page with the given records and total hint.
    pub fn new(data: Vec<T>, total_rows: Option<u64>) -> Self {
        Self {
            total_rows,
            current_page: None,
            current_size: None,
            data: Some(data),
        }
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Returns true if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the page, returning its records.
    pub fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total_rows: None,
            current_page: None,
            current_size: None,
            data: None,
        }
    }
}

/// Iterator over numbered pages, starting at page 1.
///
/// The fetch function receives the page number and returns that page.
pub struct PageIterator<T, F, Fut>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = OmadaResult<Page<T>>>,
{
    fetch_fn: F,
    next_page: u32,
    known_total: Option<u64>,
    fetched: u64,
    pages_fetched: u32,
    done: bool,
    _marker: PhantomData<T>,
}

impl<T, F, Fut> PageIterator<T, F, Fut>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = OmadaResult<Page<T>>>,
{
    /// Creates a new page iterator.
    pub fn new(fetch_fn: F) -> Self {
        Self {
            fetch_fn,
            next_page: 1,
            known_total: None,
            fetched: 0,
            pages_fetched: 0,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Fetches the records of the next page.
    ///
    /// Returns `Ok(None)` once the collection is exhausted. After an error
    /// the iterator is finished as well.
    pub async fn next_page(&mut self) -> OmadaResult<Option<Vec<T>>> {
        if self.done {
            return Ok(None);
        }

        let page_number = self.next_page;
        let page = match (self.fetch_fn)(page_number).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        // Later totals win; the first page's count may already be stale.
        if let Some(total) = page.total_rows {
            self.known_total = Some(total);
        }

        let items = page.into_items();
        self.fetched += items.len() as u64;

        debug!(
            page = page_number,
            records = items.len(),
            fetched = self.fetched,
            total = ?self.known_total,
            "Fetched page"
        );

        let total_reached = self.known_total.map_or(false, |total| self.fetched >= total);
        if items.is_empty() || total_reached {
            self.done = true;
        } else {
            self.next_page += 1;
        }

        Ok(Some(items))
    }

    /// Collects all remaining records from all pages.
    ///
    /// Records fetched before a failing page are dropped with the error.
    pub async fn collect_all(&mut self) -> OmadaResult<Vec<T>> {
        let mut all_items = Vec::new();

        while let Some(items) = self.next_page().await? {
            all_items.extend(items);
        }

        Ok(all_items)
    }

    /// Returns true if there are more pages to fetch.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Most recent `totalRows` reported by the controller.
    pub fn known_total(&self) -> Option<u64> {
        self.known_total
    }
}
