//! Listing Controller
//!
//! Search, sort and pagination over an in-memory collection.
//!
//! ## Architecture
//!
//! - [`Listing`]: synchronous state machine. `begin_*` marks a fetch as
//!   started and hands out a [`RequestToken`]; `finish_*` applies the
//!   result only if that token is still the latest one.
//! - [`ListingController`]: owns a [`ListSource`] and drives both halves
//!   for callers that can hold `&mut self` across an `.await`.
//!
//! Display layers that spawn fetches themselves (the browser UI) use
//! [`Listing`] directly, which is what makes the token checks matter:
//! overlapping loads and searches resolve in any order, the newest search
//! decides what is shown and the newest load decides the full collection.

mod pagination;
mod sort;

pub use pagination::Pagination;
pub use sort::{
    compare_keys, parse_date, sort_items, SortDirection, SortKey, SortState, Sortable,
};

use crate::api::ListSource;
use crate::error::ServiceError;

/// Identifies one fetch; only the most recently issued token is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic token source
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// What a search needs from its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Blank term: the working set now shows the full collection, or will
    /// once the load already in flight lands
    Local,
    /// Blank term before anything was loaded: fetch the full collection,
    /// then call [`Listing::finish_load`]
    Load { token: RequestToken },
    /// Fetch `term` remotely, then call [`Listing::finish_search`]
    Remote { token: RequestToken, term: String },
}

/// Table state: full collection, working set, sort and page
///
/// Full loads and searches are tracked separately. A load always refreshes
/// the full collection; it only replaces the working set while no search
/// issued after it is being shown.
#[derive(Debug, Clone)]
pub struct Listing<T: Sortable> {
    all: Vec<T>,
    items: Vec<T>,
    pagination: Pagination,
    sort: Option<SortState<T::Column>>,
    error: Option<String>,
    loads: RequestTracker,
    searches: RequestTracker,
    /// `all` holds a successfully loaded collection
    loaded: bool,
    /// The working set mirrors `all` rather than search results
    showing_all: bool,
    load_pending: bool,
    search_pending: bool,
}

impl<T: Sortable + Clone> Listing<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            items: Vec::new(),
            pagination: Pagination::new(page_size),
            sort: None,
            error: None,
            loads: RequestTracker::default(),
            searches: RequestTracker::default(),
            loaded: false,
            showing_all: true,
            load_pending: false,
            search_pending: false,
        }
    }

    /// Mark a full load as started. Any search in flight is superseded.
    pub fn begin_load(&mut self) -> RequestToken {
        self.searches.issue();
        self.search_pending = false;
        self.showing_all = true;
        self.error = None;
        self.start_load()
    }

    fn start_load(&mut self) -> RequestToken {
        self.load_pending = true;
        self.loads.issue()
    }

    /// Apply a full load. Returns `false` if a later load superseded it.
    ///
    /// On failure the previous working set is left as it was.
    pub fn finish_load(&mut self, token: RequestToken, result: Result<Vec<T>, ServiceError>) -> bool {
        if !self.loads.is_current(token) {
            tracing::debug!(?token, "Discarding superseded load");
            return false;
        }
        self.load_pending = false;

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Collection loaded");
                self.all = items;
                self.loaded = true;
                if self.showing_all {
                    let all = self.all.clone();
                    self.replace_items(all);
                }
            }
            Err(e) if self.showing_all => self.error = Some(e.message),
            Err(e) => tracing::warn!(error = %e, "Full load failed while search results are shown"),
        }
        true
    }

    /// Start a search. A blank term restores the full collection, loading
    /// it first if that has not happened yet.
    pub fn begin_search(&mut self, term: &str) -> SearchPlan {
        let term = term.trim();
        // Issued even for a blank term so an in-flight remote search is dropped
        let token = self.searches.issue();
        self.error = None;

        if term.is_empty() {
            self.search_pending = false;
            self.showing_all = true;
            let all = self.all.clone();
            self.replace_items(all);

            if self.loaded || self.load_pending {
                return SearchPlan::Local;
            }
            return SearchPlan::Load {
                token: self.start_load(),
            };
        }

        self.showing_all = false;
        self.search_pending = true;
        SearchPlan::Remote {
            token,
            term: term.to_string(),
        }
    }

    /// Apply search results to the working set, leaving the full
    /// collection untouched. Returns `false` if the response was superseded.
    pub fn finish_search(&mut self, token: RequestToken, result: Result<Vec<T>, ServiceError>) -> bool {
        if !self.searches.is_current(token) {
            tracing::debug!(?token, "Discarding superseded search");
            return false;
        }
        self.search_pending = false;

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "Search results applied");
                self.replace_items(items);
            }
            Err(e) => self.error = Some(e.message),
        }
        true
    }

    fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        if let Some(state) = self.sort {
            sort_items(&mut self.items, state.column, state.direction);
        }
        self.pagination.reset();
    }

    /// Header click: same column flips direction, new column sorts ascending
    pub fn sort(&mut self, column: T::Column) {
        let state = SortState::next(self.sort, column);
        self.sort_by(column, state.direction);
    }

    pub fn sort_by(&mut self, column: T::Column, direction: SortDirection) {
        self.sort = Some(SortState { column, direction });
        sort_items(&mut self.items, column, direction);
    }

    /// Go to page `n` (1-based). Out-of-range pages are ignored.
    pub fn page(&mut self, n: usize) -> bool {
        self.pagination.go_to(n, self.items.len())
    }

    /// Change the page size and return to page 1. Zero is ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if size == 0 {
            tracing::warn!("Ignoring page size of zero");
            return;
        }
        self.pagination.set_page_size(size);
    }

    /// Drop all loaded state, keeping page size
    pub fn clear(&mut self) {
        // Supersede anything still in flight
        self.loads.issue();
        self.searches.issue();
        self.all.clear();
        self.items.clear();
        self.sort = None;
        self.error = None;
        self.loaded = false;
        self.showing_all = true;
        self.load_pending = false;
        self.search_pending = false;
        self.pagination.reset();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Rows of the current page
    pub fn page_items(&self) -> &[T] {
        let range = self.pagination.range(self.items.len());
        &self.items[range]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn all_items(&self) -> &[T] {
        &self.all
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.items.len())
    }

    pub fn current_page(&self) -> usize {
        self.pagination.page()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    /// 1-based index of the first row on the page (0 when empty)
    pub fn start_item(&self) -> usize {
        self.pagination.start_item(self.items.len())
    }

    /// 1-based index of the last row on the page (0 when empty)
    pub fn end_item(&self) -> usize {
        self.pagination.end_item(self.items.len())
    }

    pub fn sort_state(&self) -> Option<SortState<T::Column>> {
        self.sort
    }

    /// A fetch that will change the working set is in flight
    pub fn is_loading(&self) -> bool {
        self.search_pending || (self.load_pending && self.showing_all)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A [`Listing`] bound to the service it loads from
pub struct ListingController<T: Sortable, S> {
    listing: Listing<T>,
    source: S,
}

impl<T, S> ListingController<T, S>
where
    T: Sortable + Clone,
    S: ListSource<T>,
{
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            listing: Listing::new(page_size),
            source,
        }
    }

    /// Fetch the full collection. Failures land in `listing().error()`.
    pub async fn load(&mut self) {
        let token = self.listing.begin_load();
        let result = self.source.fetch_all().await;
        self.listing.finish_load(token, result);
    }

    /// Filter by name. A blank term shows the full collection again.
    pub async fn search(&mut self, term: &str) {
        match self.listing.begin_search(term) {
            SearchPlan::Local => {}
            SearchPlan::Load { token } => {
                let result = self.source.fetch_all().await;
                self.listing.finish_load(token, result);
            }
            SearchPlan::Remote { token, term } => {
                let result = self.source.search(&term).await;
                self.listing.finish_search(token, result);
            }
        }
    }

    /// Re-run the full load after a failure
    pub async fn retry(&mut self) {
        self.load().await;
    }

    pub fn listing(&self) -> &Listing<T> {
        &self.listing
    }

    pub fn listing_mut(&mut self) -> &mut Listing<T> {
        &mut self.listing
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::api::ApiClient;
    use crate::error::HttpFailure;
    use crate::models::{Customer, CustomerColumn};
    use serde_json::json;
    use std::rc::Rc;

    fn customer(id: i64, name: &str, last: Option<&str>) -> Customer {
        Customer {
            id: Some(format!("c{}", id)),
            customer_id: id,
            customer_name: name.to_string(),
            last_order_date: last.map(str::to_string),
            next_predicted_order: None,
        }
    }

    fn sample(n: usize) -> Vec<Customer> {
        (0..n)
            .map(|i| customer(i as i64, &format!("name-{:02}", i), None))
            .collect()
    }

    fn service_error(code: u16) -> ServiceError {
        ServiceError::new("CustomerService", HttpFailure::from_status(code, None, None))
    }

    fn loaded(items: Vec<Customer>, page_size: usize) -> Listing<Customer> {
        let mut listing = Listing::new(page_size);
        let token = listing.begin_load();
        assert!(listing.finish_load(token, Ok(items)));
        listing
    }

    #[test]
    fn test_pages_reconstruct_collection() {
        for total in [0, 1, 9, 10, 11, 23] {
            for page_size in [1, 3, 10, 50] {
                let items = sample(total);
                let mut listing = loaded(items.clone(), page_size);

                let mut rebuilt = Vec::new();
                for page in 1..=listing.total_pages() {
                    assert!(listing.page(page));
                    rebuilt.extend_from_slice(listing.page_items());
                }

                assert_eq!(rebuilt, items);
                assert_eq!(listing.total_pages(), total.div_ceil(page_size));
            }
        }
    }

    #[test]
    fn test_page_bounds_and_indices() {
        let mut listing = loaded(sample(23), 10);
        assert_eq!(listing.total_pages(), 3);
        assert_eq!((listing.start_item(), listing.end_item()), (1, 10));

        assert!(!listing.page(0));
        assert!(!listing.page(4));
        assert_eq!(listing.current_page(), 1);

        assert!(listing.page(3));
        assert_eq!(listing.page_items().len(), 3);
        assert_eq!((listing.start_item(), listing.end_item()), (21, 23));

        listing.set_page_size(5);
        assert_eq!(listing.current_page(), 1);
        assert_eq!(listing.total_pages(), 5);

        listing.set_page_size(0);
        assert_eq!(listing.page_size(), 5);
    }

    #[test]
    fn test_empty_listing_indices() {
        let listing: Listing<Customer> = Listing::new(10);
        assert_eq!(listing.total_pages(), 0);
        assert_eq!((listing.start_item(), listing.end_item()), (0, 0));
        assert!(listing.page_items().is_empty());
    }

    #[test]
    fn test_sort_toggles_and_keeps_missing_last() {
        let mut listing = loaded(
            vec![
                customer(1, "b", Some("2024-02-01")),
                customer(2, "a", None),
                customer(3, "c", Some("2024-01-01")),
            ],
            10,
        );

        listing.sort(CustomerColumn::LastOrderDate);
        let ids: Vec<i64> = listing.items().iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        listing.sort(CustomerColumn::LastOrderDate);
        assert_eq!(listing.sort_state().unwrap().direction, SortDirection::Descending);
        let ids: Vec<i64> = listing.items().iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        listing.sort(CustomerColumn::Name);
        assert_eq!(listing.sort_state(), Some(SortState::ascending(CustomerColumn::Name)));
    }

    #[test]
    fn test_failed_load_keeps_working_set() {
        let mut listing = loaded(sample(3), 10);
        listing.page(1);

        let token = listing.begin_load();
        assert!(listing.is_loading());
        listing.finish_load(token, Err(service_error(500)));

        assert!(!listing.is_loading());
        assert_eq!(listing.error(), Some("Internal server error."));
        assert_eq!(listing.total(), 3);
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut listing = loaded(sample(5), 10);

        let slow = match listing.begin_search("slow") {
            SearchPlan::Remote { token, .. } => token,
            _ => panic!("expected remote search"),
        };
        let fast = match listing.begin_search("fast") {
            SearchPlan::Remote { token, .. } => token,
            _ => panic!("expected remote search"),
        };

        assert!(listing.finish_search(fast, Ok(sample(1))));
        assert!(!listing.finish_search(slow, Ok(sample(4))));
        assert_eq!(listing.total(), 1);
    }

    #[test]
    fn test_blank_search_restores_full_collection() {
        let mut listing = loaded(sample(12), 10);
        let token = match listing.begin_search("  name  ") {
            SearchPlan::Remote { token, term } => {
                assert_eq!(term, "name");
                token
            }
            _ => panic!("expected remote search"),
        };
        listing.finish_search(token, Ok(sample(2)));
        assert_eq!(listing.total(), 2);

        assert_eq!(listing.begin_search("   "), SearchPlan::Local);
        assert_eq!(listing.total(), 12);
        assert_eq!(listing.current_page(), 1);
        assert!(!listing.is_loading());
    }

    fn remote(plan: SearchPlan) -> RequestToken {
        match plan {
            SearchPlan::Remote { token, .. } => token,
            other => panic!("expected remote search, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_search_during_first_load_keeps_the_load() {
        let mut listing = Listing::new(10);
        let load = listing.begin_load();

        assert_eq!(listing.begin_search(""), SearchPlan::Local);
        assert!(listing.is_loading());

        assert!(listing.finish_load(load, Ok(sample(5))));
        assert!(!listing.is_loading());
        assert_eq!(listing.total(), 5);
        assert_eq!(listing.all_items().len(), 5);
    }

    #[test]
    fn test_load_landing_under_search_results() {
        let mut listing = Listing::new(10);
        let load = listing.begin_load();
        let search = remote(listing.begin_search("name-01"));

        assert!(listing.finish_search(search, Ok(sample(1))));
        assert!(listing.finish_load(load, Ok(sample(5))));

        // Search results stay on screen, the collection is kept for later
        assert_eq!(listing.total(), 1);
        assert_eq!(listing.all_items().len(), 5);

        assert_eq!(listing.begin_search("  "), SearchPlan::Local);
        assert_eq!(listing.total(), 5);
    }

    #[test]
    fn test_search_landing_after_load() {
        let mut listing = Listing::new(10);
        let load = listing.begin_load();
        let search = remote(listing.begin_search("name"));

        assert!(listing.finish_load(load, Ok(sample(5))));
        assert!(listing.is_loading());
        assert_eq!(listing.total(), 0);

        assert!(listing.finish_search(search, Ok(sample(2))));
        assert!(!listing.is_loading());
        assert_eq!(listing.total(), 2);
    }

    #[test]
    fn test_reload_supersedes_search_in_flight() {
        let mut listing = loaded(sample(5), 10);
        let search = remote(listing.begin_search("name"));
        let load = listing.begin_load();

        assert!(!listing.finish_search(search, Ok(sample(1))));
        assert!(listing.finish_load(load, Ok(sample(6))));
        assert_eq!(listing.total(), 6);
    }

    #[test]
    fn test_blank_search_before_any_load_requests_one() {
        let mut listing = Listing::new(10);
        let token = match listing.begin_search("   ") {
            SearchPlan::Load { token } => token,
            other => panic!("expected a load, got {:?}", other),
        };
        assert!(listing.is_loading());

        assert!(listing.finish_load(token, Ok(sample(3))));
        assert_eq!(listing.total(), 3);
        assert_eq!(listing.begin_search(""), SearchPlan::Local);
    }

    #[tokio::test]
    async fn test_controller_blank_search_fetches_collection() {
        let stub = Rc::new(StubTransport::new());
        stub.respond(
            "/Predictions",
            json!({"data": [
                {"customerId": 1, "customerName": "Alfreds"},
                {"customerId": 2, "customerName": "Berglunds"}
            ]}),
        );

        let api = ApiClient::new(stub.clone());
        let mut controller = ListingController::new(api.customers(), 10);

        controller.search("  ").await;
        assert_eq!(controller.listing().total(), 2);
        assert_eq!(stub.calls(), vec!["GET /Predictions".to_string()]);
    }

    #[test]
    fn test_active_sort_survives_reload() {
        let mut listing = loaded(sample(3), 10);
        listing.sort_by(CustomerColumn::Name, SortDirection::Descending);

        let token = listing.begin_load();
        listing.finish_load(token, Ok(sample(4)));

        let names: Vec<&str> = listing.items().iter().map(|c| c.customer_name.as_str()).collect();
        assert_eq!(names, vec!["name-03", "name-02", "name-01", "name-00"]);
    }

    #[tokio::test]
    async fn test_controller_load_and_search() {
        let stub = Rc::new(StubTransport::new());
        stub.respond(
            "/Predictions",
            json!({"data": [
                {"customerId": 1, "customerName": "Alfreds"},
                {"customerId": 2, "customerName": "Berglunds"}
            ], "totalPages": 1, "totalRows": 2}),
        );
        stub.respond(
            "/Predictions?search=berg",
            json!({"data": [{"customerId": 2, "customerName": "Berglunds"}]}),
        );

        let api = ApiClient::new(stub.clone());
        let mut controller = ListingController::new(api.customers(), 10);

        controller.load().await;
        assert_eq!(controller.listing().total(), 2);
        assert_eq!(controller.listing().items()[0].row_id(), "customer_1");

        controller.search(" berg ").await;
        assert_eq!(controller.listing().total(), 1);
        assert_eq!(controller.listing().items()[0].row_id(), "search_1");
        assert_eq!(controller.listing().all_items().len(), 2);

        controller.search("").await;
        assert_eq!(controller.listing().total(), 2);
    }

    #[tokio::test]
    async fn test_controller_failure_then_retry() {
        let stub = Rc::new(StubTransport::new());
        stub.fail("/Predictions", HttpFailure::from_status(0, None, None));

        let api = ApiClient::new(stub.clone());
        let mut controller = ListingController::new(api.customers(), 10);

        controller.load().await;
        assert!(!controller.listing().is_loading());
        assert!(controller
            .listing()
            .error()
            .unwrap()
            .starts_with("Unable to reach the server"));

        stub.respond("/Predictions", json!({"data": [{"customerId": 9, "customerName": "Ernst"}]}));
        controller.retry().await;
        assert_eq!(controller.listing().error(), None);
        assert_eq!(controller.listing().total(), 1);
    }
}
