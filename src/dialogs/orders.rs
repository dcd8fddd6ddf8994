use super::CustomerRef;
use crate::api::OrderService;
use crate::error::ServiceError;
use crate::listing::{Listing, RequestToken, RequestTracker};
use crate::models::{Order, OrderSummary};

/// A customer's order history, with an optional full-order detail pane
#[derive(Debug, Clone)]
pub struct OrdersDialog {
    customer: Option<CustomerRef>,
    orders: Listing<OrderSummary>,
    detail: Option<Order>,
    detail_loading: bool,
    detail_error: Option<String>,
    detail_requests: RequestTracker,
}

impl OrdersDialog {
    pub fn new(page_size: usize) -> Self {
        Self {
            customer: None,
            orders: Listing::new(page_size),
            detail: None,
            detail_loading: false,
            detail_error: None,
            detail_requests: RequestTracker::default(),
        }
    }

    /// Open for `customer` and mark its orders as loading.
    ///
    /// Anything left over from a previous customer is dropped first.
    pub fn open(&mut self, customer: CustomerRef) -> RequestToken {
        self.close();
        tracing::debug!(customer_id = customer.id, "Opening orders dialog");
        self.customer = Some(customer);
        self.orders.begin_load()
    }

    /// Apply the order summaries. Returns `false` if superseded.
    pub fn finish_open(&mut self, token: RequestToken, result: Result<Vec<OrderSummary>, ServiceError>) -> bool {
        self.orders.finish_load(token, result)
    }

    /// Open and fetch `GET /Customers/{id}/orders`
    pub async fn open_and_load(&mut self, service: &OrderService, customer: CustomerRef) {
        let customer_id = customer.id;
        let token = self.open(customer);
        let result = service.customer_orders(customer_id).await;
        self.finish_open(token, result);
    }

    /// Re-fetch the orders of the open customer
    pub async fn retry(&mut self, service: &OrderService) {
        let Some(customer_id) = self.customer.as_ref().map(|c| c.id) else {
            return;
        };
        let token = self.orders.begin_load();
        let result = service.customer_orders(customer_id).await;
        self.finish_open(token, result);
    }

    pub fn begin_show_order(&mut self) -> RequestToken {
        self.detail_loading = true;
        self.detail_error = None;
        self.detail_requests.issue()
    }

    pub fn finish_show_order(&mut self, token: RequestToken, result: Result<Order, ServiceError>) -> bool {
        if !self.detail_requests.is_current(token) {
            tracing::debug!("Discarding superseded order detail");
            return false;
        }

        self.detail_loading = false;
        match result {
            Ok(order) => {
                self.detail = Some(order);
                self.detail_error = None;
            }
            Err(e) => {
                self.detail = None;
                self.detail_error = Some(e.message);
            }
        }
        true
    }

    /// Fetch `GET /Orders/{id}` into the detail pane
    pub async fn show_order(&mut self, service: &OrderService, order_id: i64) {
        let token = self.begin_show_order();
        let result = service.get(order_id).await;
        self.finish_show_order(token, result);
    }

    pub fn close_detail(&mut self) {
        self.detail_requests.issue();
        self.detail = None;
        self.detail_loading = false;
        self.detail_error = None;
    }

    /// Clear everything loaded, keeping the page size
    pub fn close(&mut self) {
        self.customer = None;
        self.orders.clear();
        self.close_detail();
    }

    pub fn is_open(&self) -> bool {
        self.customer.is_some()
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn orders(&self) -> &Listing<OrderSummary> {
        &self.orders
    }

    /// Sorting and paging of the summary table
    pub fn orders_mut(&mut self) -> &mut Listing<OrderSummary> {
        &mut self.orders
    }

    pub fn detail(&self) -> Option<&Order> {
        self.detail.as_ref()
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail_loading
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.detail_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::api::ApiClient;
    use crate::error::HttpFailure;
    use crate::listing::SortDirection;
    use crate::models::OrderSummaryColumn;
    use serde_json::json;
    use std::rc::Rc;

    fn alfki() -> CustomerRef {
        CustomerRef {
            id: 1,
            name: "Alfreds Futterkiste".to_string(),
        }
    }

    fn setup() -> (Rc<StubTransport>, OrderService) {
        let stub = Rc::new(StubTransport::new());
        let service = ApiClient::new(stub.clone()).orders();
        stub.respond(
            "/Customers/1/orders",
            json!([
                {"orderId": 10643, "requiredDate": "1997-09-22T00:00:00", "shipCity": "Berlin"},
                {"orderId": 10692, "requiredDate": "1997-10-31T00:00:00", "shippedDate": "1997-10-13T00:00:00"},
                {"orderId": 10702, "requiredDate": "1997-11-24T00:00:00", "shippedDate": "1997-10-21T00:00:00"}
            ]),
        );
        (stub, service)
    }

    #[tokio::test]
    async fn test_open_loads_summaries() {
        let (_stub, service) = setup();
        let mut dialog = OrdersDialog::new(2);

        dialog.open_and_load(&service, alfki()).await;

        assert!(dialog.is_open());
        assert_eq!(dialog.orders().total(), 3);
        assert_eq!(dialog.orders().page_items().len(), 2);
        assert_eq!(dialog.orders().total_pages(), 2);
        assert!(!dialog.orders().is_loading());
    }

    #[tokio::test]
    async fn test_sort_shipped_date_puts_unshipped_last() {
        let (_stub, service) = setup();
        let mut dialog = OrdersDialog::new(10);
        dialog.open_and_load(&service, alfki()).await;

        dialog.orders_mut().sort(OrderSummaryColumn::ShippedDate);
        let ids: Vec<i64> = dialog.orders().items().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![10692, 10702, 10643]);

        dialog.orders_mut().sort(OrderSummaryColumn::ShippedDate);
        assert_eq!(
            dialog.orders().sort_state().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        let ids: Vec<i64> = dialog.orders().items().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![10702, 10692, 10643]);
    }

    #[tokio::test]
    async fn test_close_clears_everything() {
        let (stub, service) = setup();
        stub.respond("/Orders/10643", json!({"orderId": 10643, "freight": 29.46}));
        let mut dialog = OrdersDialog::new(10);
        dialog.open_and_load(&service, alfki()).await;
        dialog.show_order(&service, 10643).await;
        assert_eq!(dialog.detail().map(|o| o.order_id), Some(10643));

        dialog.close();

        assert!(!dialog.is_open());
        assert_eq!(dialog.orders().total(), 0);
        assert!(dialog.detail().is_none());
        assert_eq!(dialog.orders().page_size(), 10);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_dialog_open_with_error() {
        let stub = Rc::new(StubTransport::new());
        let service = ApiClient::new(stub.clone()).orders();
        stub.fail("/Customers/1/orders", HttpFailure::from_status(500, None, None));
        let mut dialog = OrdersDialog::new(10);

        dialog.open_and_load(&service, alfki()).await;

        assert!(dialog.is_open());
        assert_eq!(dialog.orders().error(), Some("Internal server error."));

        stub.respond("/Customers/1/orders", json!([{"orderId": 1}]));
        dialog.retry(&service).await;
        assert_eq!(dialog.orders().error(), None);
        assert_eq!(dialog.orders().total(), 1);
    }

    #[tokio::test]
    async fn test_detail_failure_is_shown_in_pane() {
        let (_stub, service) = setup();
        let mut dialog = OrdersDialog::new(10);
        dialog.open_and_load(&service, alfki()).await;

        dialog.show_order(&service, 99).await;

        assert!(dialog.detail().is_none());
        assert_eq!(dialog.detail_error(), Some("Resource not found."));
    }

    #[test]
    fn test_superseded_summaries_are_dropped() {
        let mut dialog = OrdersDialog::new(10);
        let stale = dialog.open(alfki());
        let fresh = dialog.open(CustomerRef {
            id: 2,
            name: "Ana Trujillo".to_string(),
        });

        let order = |id| OrderSummary {
            order_id: id,
            required_date: None,
            shipped_date: None,
            ship_name: None,
            ship_address: None,
            ship_city: None,
        };

        assert!(dialog.finish_open(fresh, Ok(vec![order(2)])));
        assert!(!dialog.finish_open(stale, Ok(vec![order(1)])));
        assert_eq!(dialog.orders().items()[0].order_id, 2);
    }
}
