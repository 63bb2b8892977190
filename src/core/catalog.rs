//! Catalog query state
//!
//! One page of products at a time. Failed fetches set an error but never
//! clear the last page that loaded successfully.

use crate::adapters::catalog::ProductApi;
use crate::core::notify::Notifier;
use crate::domain::{ApiError, PagedResponse, Product};
use std::sync::Arc;
use tokio::sync::watch;

/// Message for a fetch that failed in transport
pub const FETCH_FAILED: &str = "Failed to fetch products";

/// Entry in a page bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// Link to a 0-based page index
    Page(usize),
    /// Gap between non-adjacent pages
    Ellipsis,
}

/// Last successfully loaded page
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Products on the page
    pub items: Vec<Product>,
    /// 0-based index of the page
    pub page_index: usize,
    /// Number of pages
    pub total_pages: usize,
    /// Products across all pages
    pub total_elements: u64,
}

impl From<PagedResponse<Product>> for PageState {
    fn from(page: PagedResponse<Product>) -> Self {
        Self {
            items: page.content,
            page_index: page.page,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
        }
    }
}

/// Browsable view of the product catalog
pub struct CatalogQuery {
    api: Arc<dyn ProductApi>,
    notifier: Arc<dyn Notifier>,
    page_size: usize,
    page: Option<PageState>,
    error: Option<String>,
    loading: bool,
}

impl CatalogQuery {
    /// A query that has not fetched anything yet
    pub fn new(api: Arc<dyn ProductApi>, notifier: Arc<dyn Notifier>, page_size: usize) -> Self {
        Self {
            api,
            notifier,
            page_size: page_size.max(1),
            page: None,
            error: None,
            loading: false,
        }
    }

    /// Fetch the first page
    pub async fn load(&mut self) {
        self.fetch(0).await;
    }

    /// Fetch page `page` if it exists
    ///
    /// Returns `false` without fetching when `page` is outside
    /// `[0, total_pages)`, including before anything has loaded.
    pub async fn go_to_page(&mut self, page: usize) -> bool {
        if page >= self.total_pages() {
            tracing::debug!(page, total_pages = self.total_pages(), "Ignoring out-of-range page");
            return false;
        }
        self.fetch(page).await;
        true
    }

    /// Re-fetch the current page
    pub async fn refresh(&mut self) {
        self.fetch(self.current_page()).await;
    }

    /// Refresh if `signal` changed since it was last seen
    ///
    /// Pair with `SubmissionCoordinator::refresh_signal` so a successful
    /// upload shows up in the listing.
    pub async fn refresh_if_signalled(&mut self, signal: &mut watch::Receiver<u64>) -> bool {
        match signal.has_changed() {
            Ok(true) => {
                signal.borrow_and_update();
                self.refresh().await;
                true
            }
            _ => false,
        }
    }

    async fn fetch(&mut self, page: usize) {
        self.loading = true;
        self.error = None;

        match self
            .api
            .fetch_page(page, self.page_size)
            .await
            .map(|response| response.into_data())
        {
            Ok(Ok(Some(data))) => {
                tracing::debug!(
                    page = data.page,
                    items = data.content.len(),
                    total_pages = data.total_pages,
                    "Catalog page loaded"
                );
                self.page = Some(data.into());
            }
            Ok(Ok(None)) => self.fail_transport("successful response without data"),
            Ok(Err(ApiError::Rejected(message))) => {
                tracing::warn!(page, message = %message, "Catalog fetch rejected");
                self.error = Some(message);
            }
            Ok(Err(e)) => self.fail_transport(&e.to_string()),
            Err(e) => self.fail_transport(&e.to_string()),
        }

        self.loading = false;
    }

    fn fail_transport(&mut self, detail: &str) {
        tracing::warn!(error = %detail, "Catalog fetch failed");
        self.error = Some(FETCH_FAILED.to_string());
        self.notifier.error(FETCH_FAILED);
    }

    /// Products on the current page
    pub fn products(&self) -> &[Product] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or_default()
    }

    /// Last loaded page, if any
    pub fn page(&self) -> Option<&PageState> {
        self.page.as_ref()
    }

    /// 0-based index of the current page
    pub fn current_page(&self) -> usize {
        self.page.as_ref().map_or(0, |p| p.page_index)
    }

    /// Number of pages; 0 before the first successful load
    pub fn total_pages(&self) -> usize {
        self.page.as_ref().map_or(0, |p| p.total_pages)
    }

    /// Error from the most recent fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a fetch is in progress
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Requested page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.current_page() > 0
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.current_page() + 1 < self.total_pages()
    }

    /// Page bar for the current position
    pub fn page_links(&self) -> Vec<PageLink> {
        page_links(self.current_page(), self.total_pages())
    }
}

/// Pages to show around `current` (0-based) out of `total_pages`
///
/// First and last page are always present, with up to two neighbours on
/// each side of `current`; skipped runs collapse into one
/// [`PageLink::Ellipsis`]. Empty when there is at most one page.
pub fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    const DELTA: i64 = 2;

    if total_pages <= 1 {
        return Vec::new();
    }

    // 1-based page numbers from here on
    let total = total_pages as i64;
    let current = (current as i64).clamp(0, total - 1) + 1;
    let link = |number: i64| PageLink::Page((number - 1) as usize);

    let mut links = vec![link(1)];
    if current - DELTA > 2 {
        links.push(PageLink::Ellipsis);
    }
    links.extend(((current - DELTA).max(2)..=(current + DELTA).min(total - 1)).map(link));
    if current + DELTA < total - 1 {
        links.push(PageLink::Ellipsis);
    }
    links.push(link(total));
    links
}
