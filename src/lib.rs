//! # SalesDesk
//!
//! Browse customers and their orders against a Northwind-style REST backend.
//!
//! ## Features
//!
//! - **Customers table**: search, column sort and pagination over an in-memory working set
//! - **Orders dialog**: a customer's order summaries, sortable, with a full-order detail pane
//! - **New-order dialog**: lookup lists, a line-item editor and client-side validation
//! - **Uniform errors**: every transport failure becomes one display-ready message
//!
//! ## Modules
//!
//! - [`models`]: Wire types for customers, orders and lookup lists
//! - [`error`]: Failure taxonomy and the message normalizer
//! - [`api`]: Transport seam and the typed data access services
//! - [`listing`]: Search/sort/paginate controller for tables
//! - [`dialogs`]: Orders and new-order dialog controllers
//! - `config`: TOML configuration with environment overrides (native only)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use salesdesk::api::{ApiClient, HttpTransport};
//! use salesdesk::config::ApiConfig;
//! use salesdesk::listing::ListingController;
//! use salesdesk::models::CustomerColumn;
//! use std::rc::Rc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new(&ApiConfig::default())?;
//!     let api = ApiClient::new(Rc::new(transport));
//!
//!     let mut customers = ListingController::new(api.customers(), 10);
//!     customers.load().await;
//!     customers.listing_mut().sort(CustomerColumn::Name);
//!
//!     for customer in customers.listing().page_items() {
//!         println!("{}", customer.customer_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(feature = "native")]
pub mod config;
pub mod dialogs;
pub mod error;
pub mod listing;
pub mod models;

// Re-export top-level types for convenience
pub use api::{
    ApiClient, CustomerService, ListSource, LookupService, OrderService, Resource, Transport,
};

#[cfg(feature = "native")]
pub use api::HttpTransport;

pub use error::{normalize, FailureClass, HttpFailure, ServiceError};

pub use listing::{
    Listing, ListingController, RequestToken, SortDirection, SortKey, SortState, Sortable,
};

pub use dialogs::{CustomerRef, DraftError, LineItem, NewOrderDialog, OrderDraft, OrdersDialog};

pub use models::{
    CreateOrderCommand, Customer, CustomerColumn, Employee, Lookup, Order, OrderDetail,
    OrderSummary, OrderSummaryColumn, PageRequest, Paginated, Product, Shipper,
};

#[cfg(feature = "native")]
pub use config::{ApiConfig, Config, ConfigError, ListingConfig, LoggingConfig, LookupsConfig};
