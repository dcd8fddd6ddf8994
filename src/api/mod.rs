//! Data Access Services
//!
//! Typed facades over one generic [`Resource`] client. Every failure is
//! normalized into a [`ServiceError`] here, so controllers only ever see
//! display-ready messages.

#[cfg(feature = "native")]
mod http;
mod resource;
#[cfg(test)]
pub(crate) mod stub;
pub mod transport;

#[cfg(feature = "native")]
pub use http::HttpTransport;
pub use resource::Resource;
pub use transport::{build_url, query_string, server_message, Transport};

use async_trait::async_trait;
use futures_util::future::try_join3;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::ServiceError;
use crate::models::{
    assign_ids, CreateOrderCommand, Customer, Employee, Order, OrderSummary, PageRequest,
    Paginated, Product, Shipper,
};

/// Page size used to fetch a whole lookup list in one request
pub const DEFAULT_LOOKUP_PAGE_SIZE: u32 = 1000;

/// Where a listing controller loads its rows from
#[async_trait(?Send)]
pub trait ListSource<T> {
    /// The full collection
    async fn fetch_all(&self) -> Result<Vec<T>, ServiceError>;

    /// Rows matching a non-blank, trimmed name term
    async fn search(&self, term: &str) -> Result<Vec<T>, ServiceError>;
}

/// Entry point: hands out the typed services over one transport
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    lookup_page_size: u32,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self {
            transport,
            lookup_page_size: DEFAULT_LOOKUP_PAGE_SIZE,
        }
    }

    pub fn with_lookup_page_size(mut self, page_size: u32) -> Self {
        self.lookup_page_size = page_size.max(1);
        self
    }

    pub fn customers(&self) -> CustomerService {
        CustomerService {
            resource: Resource::new(Rc::clone(&self.transport), "/Predictions", "CustomerService"),
        }
    }

    pub fn orders(&self) -> OrderService {
        OrderService {
            customers: Resource::new(Rc::clone(&self.transport), "/Customers", "OrderService"),
            orders: Resource::new(Rc::clone(&self.transport), "/Orders", "OrderService"),
        }
    }

    pub fn employees(&self) -> LookupService<Employee> {
        self.lookup("/Employees", "EmployeeService")
    }

    pub fn shippers(&self) -> LookupService<Shipper> {
        self.lookup("/Shippers", "ShipperService")
    }

    pub fn products(&self) -> LookupService<Product> {
        self.lookup("/Products", "ProductService")
    }

    fn lookup<T>(&self, path: &'static str, service: &'static str) -> LookupService<T> {
        LookupService {
            resource: Resource::new(Rc::clone(&self.transport), path, service),
            page_size: self.lookup_page_size,
            _marker: PhantomData,
        }
    }

    /// Employees, shippers and products, fetched concurrently.
    ///
    /// All three must succeed; the first failure fails the whole join.
    pub async fn lookups(&self) -> Result<(Vec<Employee>, Vec<Shipper>, Vec<Product>), ServiceError> {
        let employees = self.employees();
        let shippers = self.shippers();
        let products = self.products();

        try_join3(employees.all(), shippers.all(), products.all()).await
    }
}

/// Customers with their order predictions
#[derive(Clone)]
pub struct CustomerService {
    resource: Resource,
}

impl CustomerService {
    /// All customers, with row ids `customer_{n}` filled in
    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        let mut customers = self.page(PageRequest::default()).await?.data;
        assign_ids(&mut customers, "customer");
        Ok(customers)
    }

    /// Customers whose name matches `term`, with row ids `search_{n}`.
    /// A blank term is the same as [`list`](Self::list).
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Customer>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list().await;
        }

        let mut customers: Vec<Customer> = self
            .resource
            .get_mapped(&[], &[("search", term.to_string())], |page: Paginated<Customer>| {
                page.data
            })
            .await?;
        assign_ids(&mut customers, "search");
        Ok(customers)
    }

    /// One server-side page
    pub async fn page(&self, request: PageRequest) -> Result<Paginated<Customer>, ServiceError> {
        self.resource.get(&[], &request.query_params()).await
    }
}

#[async_trait(?Send)]
impl ListSource<Customer> for CustomerService {
    async fn fetch_all(&self) -> Result<Vec<Customer>, ServiceError> {
        self.list().await
    }

    async fn search(&self, term: &str) -> Result<Vec<Customer>, ServiceError> {
        self.search_by_name(term).await
    }
}

/// Order history, order details and order creation
#[derive(Clone)]
pub struct OrderService {
    customers: Resource,
    orders: Resource,
}

impl OrderService {
    /// `GET /Customers/{id}/orders`
    pub async fn customer_orders(&self, customer_id: i64) -> Result<Vec<OrderSummary>, ServiceError> {
        let id = customer_id.to_string();
        self.customers.get(&[id.as_str(), "orders"], &[]).await
    }

    /// `GET /Orders/{id}`
    pub async fn get(&self, order_id: i64) -> Result<Order, ServiceError> {
        let id = order_id.to_string();
        self.orders.get(&[id.as_str()], &[]).await
    }

    /// `POST /Orders`. The created order is returned as the server sent it.
    pub async fn create(&self, command: &CreateOrderCommand) -> Result<serde_json::Value, ServiceError> {
        let created: serde_json::Value = self.orders.post(command).await?;
        tracing::info!(
            order_id = ?created.get("orderId"),
            lines = command.details.len(),
            "Order created"
        );
        Ok(created)
    }
}

/// A paginated selection list (employees, shippers, products)
pub struct LookupService<T> {
    resource: Resource,
    page_size: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for LookupService<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            page_size: self.page_size,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> LookupService<T> {
    /// The whole list, as the first page of a very large page size
    pub async fn all(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.page(PageRequest::new(1, self.page_size)).await?.data)
    }

    pub async fn page(&self, request: PageRequest) -> Result<Paginated<T>, ServiceError> {
        self.resource.get(&[], &request.query_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubTransport;
    use super::*;
    use crate::error::{FailureClass, HttpFailure};
    use serde_json::json;

    fn client() -> (Rc<StubTransport>, ApiClient) {
        let stub = Rc::new(StubTransport::new());
        let api = ApiClient::new(stub.clone());
        (stub, api)
    }

    #[tokio::test]
    async fn test_customer_orders_path() {
        let (stub, api) = client();
        stub.respond(
            "/Customers/42/orders",
            json!([{"orderId": 1, "requiredDate": "2024-01-01T00:00:00"}]),
        );

        let orders = api.orders().customer_orders(42).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(stub.calls(), vec!["GET /Customers/42/orders"]);
    }

    #[tokio::test]
    async fn test_lookup_requests_one_big_page() {
        let (stub, api) = client();
        stub.respond(
            "/Employees?pageNumber=1&pageSize=1000",
            json!({"data": [{"empId": 1, "fullName": "Sara Davis"}], "totalPages": 1, "totalRows": 1}),
        );

        let employees = api.employees().all().await.unwrap();
        assert_eq!(employees[0].full_name, "Sara Davis");
    }

    #[tokio::test]
    async fn test_failure_is_normalized_with_service_name() {
        let (stub, api) = client();
        stub.fail("/Orders/7", HttpFailure::from_status(404, None, None));

        let err = api.orders().get(7).await.unwrap_err();
        assert_eq!(err.service, "OrderService");
        assert_eq!(err.class(), FailureClass::NotFound);
        assert_eq!(err.to_string(), "Resource not found.");
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_reported() {
        let (stub, api) = client();
        stub.respond("/Orders/7", json!({"unexpected": true}));

        let err = api.orders().get(7).await.unwrap_err();
        assert!(err.message.starts_with("Unexpected response from server"));
    }

    #[tokio::test]
    async fn test_lookups_join_fails_as_a_whole() {
        let (stub, api) = client();
        stub.respond(
            "/Employees?pageNumber=1&pageSize=1000",
            json!({"data": [{"empId": 1, "fullName": "Sara Davis"}]}),
        );
        stub.fail(
            "/Shippers?pageNumber=1&pageSize=1000",
            HttpFailure::from_status(503, None, None),
        );
        stub.respond(
            "/Products?pageNumber=1&pageSize=1000",
            json!({"data": [{"productId": 1, "productName": "Chai"}]}),
        );

        let err = api.lookups().await.unwrap_err();
        assert_eq!(err.service, "ShipperService");
        assert_eq!(err.to_string(), "Service temporarily unavailable.");
    }

    #[tokio::test]
    async fn test_blank_search_lists_everything() {
        let (stub, api) = client();
        stub.respond("/Predictions", json!({"data": [{"customerId": 1, "customerName": "A"}]}));

        let customers = api.customers().search_by_name("   ").await.unwrap();
        assert_eq!(customers[0].row_id(), "customer_1");
        assert_eq!(stub.calls(), vec!["GET /Predictions"]);
    }
}
