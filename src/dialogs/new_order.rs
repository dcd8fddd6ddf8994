use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use super::CustomerRef;
use crate::api::{ApiClient, OrderService};
use crate::error::ServiceError;
use crate::listing::{parse_date, RequestToken, RequestTracker};
use crate::models::{CreateOrderCommand, CreateOrderDetail, Employee, Product, Shipper};

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, the one timestamp format sent to the server
pub const CANONICAL_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Days between the order date and the default required date
const DEFAULT_LEAD_DAYS: i64 = 7;

/// Why a draft cannot be submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Add at least one line item with a product and a quantity.")]
    NoValidLineItems,

    #[error("Invalid {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// One product line of a draft
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: i64,
    pub unit_price: f64,
    pub qty: i32,
    /// Percentage, 0-100
    pub discount: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            product_id: 0,
            unit_price: 0.0,
            qty: 1,
            discount: 0.0,
        }
    }
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.qty) * (1.0 - self.discount / 100.0)
    }

    /// A chosen product and a positive quantity
    pub fn is_valid(&self) -> bool {
        self.product_id > 0 && self.qty > 0
    }
}

/// The editable new-order form. Always holds at least one line item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_id: Option<i64>,
    pub employee_id: i64,
    pub shipper_id: i64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_country: String,
    /// Form input text, e.g. `2024-03-01`
    pub order_date: String,
    pub required_date: String,
    pub shipped_date: String,
    pub freight: f64,
    line_items: Vec<LineItem>,
}

impl OrderDraft {
    /// A blank draft dated `today`, required a week later
    pub fn new(customer_id: Option<i64>, today: NaiveDate) -> Self {
        let required = today + Duration::days(DEFAULT_LEAD_DAYS);
        Self {
            customer_id,
            employee_id: 0,
            shipper_id: 0,
            ship_name: String::new(),
            ship_address: String::new(),
            ship_city: String::new(),
            ship_country: String::new(),
            order_date: today.format("%Y-%m-%d").to_string(),
            required_date: required.format("%Y-%m-%d").to_string(),
            shipped_date: String::new(),
            freight: 0.0,
            line_items: vec![LineItem::default()],
        }
    }

    pub fn for_today(customer_id: Option<i64>) -> Self {
        Self::new(customer_id, Local::now().date_naive())
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn line_item_mut(&mut self, index: usize) -> Option<&mut LineItem> {
        self.line_items.get_mut(index)
    }

    pub fn add_line_item(&mut self) {
        self.line_items.push(LineItem::default());
    }

    /// Remove a line. The last remaining line cannot be removed.
    pub fn remove_line_item(&mut self, index: usize) -> bool {
        if self.line_items.len() <= 1 || index >= self.line_items.len() {
            return false;
        }
        self.line_items.remove(index);
        true
    }

    /// Sum of line totals plus freight
    pub fn total(&self) -> f64 {
        self.line_items.iter().map(LineItem::total).sum::<f64>() + self.freight
    }

    pub fn valid_line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.is_valid())
    }

    /// Whether the submit control should be enabled
    pub fn is_form_valid(&self) -> bool {
        self.employee_id > 0
            && self.shipper_id > 0
            && !self.ship_name.trim().is_empty()
            && self.valid_line_items().next().is_some()
    }

    /// Build the creation payload from the valid lines only
    pub fn to_command(&self) -> Result<CreateOrderCommand, DraftError> {
        let details: Vec<CreateOrderDetail> = self
            .valid_line_items()
            .map(|item| CreateOrderDetail {
                product_id: item.product_id,
                unit_price: item.unit_price,
                qty: item.qty,
                discount: item.discount,
            })
            .collect();

        if details.is_empty() {
            return Err(DraftError::NoValidLineItems);
        }

        Ok(CreateOrderCommand {
            cust_id: self.customer_id,
            emp_id: self.employee_id,
            shipper_id: self.shipper_id,
            ship_name: self.ship_name.trim().to_string(),
            ship_address: self.ship_address.trim().to_string(),
            ship_city: self.ship_city.trim().to_string(),
            ship_country: self.ship_country.trim().to_string(),
            order_date: canonical_timestamp("order date", &self.order_date)?,
            required_date: canonical_timestamp("required date", &self.required_date)?,
            shipped_date: canonical_timestamp("shipped date", &self.shipped_date)?,
            freight: self.freight,
            details,
        })
    }
}

/// Normalize form date text; blank means "not set"
fn canonical_timestamp(field: &'static str, value: &str) -> Result<Option<String>, DraftError> {
    if value.trim().is_empty() {
        return Ok(None);
    }

    parse_date(value)
        .map(|dt| Some(dt.format(CANONICAL_TIMESTAMP).to_string()))
        .ok_or_else(|| DraftError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// New-order form state: lookup lists, the draft and submission status
#[derive(Debug, Clone)]
pub struct NewOrderDialog {
    customer: Option<CustomerRef>,
    opened_on: NaiveDate,
    draft: OrderDraft,
    employees: Vec<Employee>,
    shippers: Vec<Shipper>,
    products: Vec<Product>,
    lookups_loaded: bool,
    loading_lookups: bool,
    submitting: bool,
    submissions: RequestTracker,
    error: Option<String>,
    open: bool,
}

impl Default for NewOrderDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl NewOrderDialog {
    pub fn new() -> Self {
        let today = Local::now().date_naive();
        Self {
            customer: None,
            opened_on: today,
            draft: OrderDraft::new(None, today),
            employees: Vec::new(),
            shippers: Vec::new(),
            products: Vec::new(),
            lookups_loaded: false,
            loading_lookups: false,
            submitting: false,
            submissions: RequestTracker::default(),
            error: None,
            open: false,
        }
    }

    /// Open with a fresh draft dated `today`. Lookups already loaded are kept.
    pub fn open(&mut self, customer: Option<CustomerRef>, today: NaiveDate) {
        tracing::debug!(customer_id = ?customer.as_ref().map(|c| c.id), "Opening new-order dialog");
        self.abandon_submission();
        self.draft = OrderDraft::new(customer.as_ref().map(|c| c.id), today);
        self.customer = customer;
        self.opened_on = today;
        self.error = None;
        self.open = true;
    }

    /// Close the form. A submission still in flight no longer touches it.
    pub fn close(&mut self) {
        self.abandon_submission();
        self.open = false;
        self.error = None;
    }

    fn abandon_submission(&mut self) {
        if self.submitting {
            self.submissions.issue();
            self.submitting = false;
        }
    }

    /// Mark lookups as loading. `false` if they are cached or already in flight.
    pub fn begin_lookups(&mut self) -> bool {
        if self.lookups_loaded || self.loading_lookups {
            return false;
        }
        self.loading_lookups = true;
        self.error = None;
        true
    }

    /// Apply the joined lookups. Any failure leaves all three lists empty.
    pub fn finish_lookups(
        &mut self,
        result: Result<(Vec<Employee>, Vec<Shipper>, Vec<Product>), ServiceError>,
    ) {
        self.loading_lookups = false;
        match result {
            Ok((employees, shippers, products)) => {
                tracing::debug!(
                    employees = employees.len(),
                    shippers = shippers.len(),
                    products = products.len(),
                    "Lookups loaded"
                );
                self.employees = employees;
                self.shippers = shippers;
                self.products = products;
                self.lookups_loaded = true;
            }
            Err(e) => {
                self.employees.clear();
                self.shippers.clear();
                self.products.clear();
                self.error = Some(format!("Failed to load form data: {}", e.message));
            }
        }
    }

    /// Fetch employees, shippers and products on first use
    pub async fn load_lookups(&mut self, api: &ApiClient) {
        if self.begin_lookups() {
            let result = api.lookups().await;
            self.finish_lookups(result);
        }
    }

    pub fn add_line_item(&mut self) {
        self.draft.add_line_item();
    }

    pub fn remove_line_item(&mut self, index: usize) -> bool {
        self.draft.remove_line_item(index)
    }

    /// Choose a product for a line, prefilling its price if it has none yet
    pub fn select_product(&mut self, index: usize, product_id: i64) {
        let list_price = self
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .and_then(|p| p.unit_price);

        if let Some(item) = self.draft.line_item_mut(index) {
            item.product_id = product_id;
            if item.unit_price == 0.0 {
                if let Some(price) = list_price {
                    item.unit_price = price;
                }
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.draft.total()
    }

    /// Validate the draft and mark a submission as in flight.
    ///
    /// `None` if a submission is already running or the draft was rejected;
    /// a rejection is reported through [`error`](Self::error).
    pub fn begin_submission(&mut self) -> Option<(RequestToken, CreateOrderCommand)> {
        if self.submitting {
            tracing::debug!("Ignoring submission while another is in flight");
            return None;
        }

        match self.draft.to_command() {
            Ok(command) => {
                self.submitting = true;
                self.error = None;
                Some((self.submissions.issue(), command))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Draft rejected");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the create result. On success the form is reset and closed
    /// and the created order is handed back.
    ///
    /// If the form was closed or reopened since `token` was issued, the
    /// result leaves it alone; a created order is still handed back.
    pub fn finish_submission(
        &mut self,
        token: RequestToken,
        result: Result<Value, ServiceError>,
    ) -> Option<Value> {
        if !self.submissions.is_current(token) || !self.submitting {
            return match result {
                Ok(created) => {
                    tracing::debug!("Order created after its form was closed");
                    Some(created)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Order creation failed after its form was closed");
                    None
                }
            };
        }

        self.submitting = false;
        match result {
            Ok(created) => {
                self.draft = OrderDraft::new(self.customer.as_ref().map(|c| c.id), self.opened_on);
                self.close();
                Some(created)
            }
            Err(e) => {
                self.error = Some(format!("Failed to create order: {}", e.message));
                None
            }
        }
    }

    /// Validate, `POST /Orders` and apply the result
    pub async fn submit(&mut self, service: &OrderService) -> Option<Value> {
        let (token, command) = self.begin_submission()?;
        let result = service.create(&command).await;
        self.finish_submission(token, result)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.customer.as_ref()
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut OrderDraft {
        &mut self.draft
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn shippers(&self) -> &[Shipper] {
        &self.shippers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn lookups_loaded(&self) -> bool {
        self.lookups_loaded
    }

    pub fn is_loading_lookups(&self) -> bool {
        self.loading_lookups
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
