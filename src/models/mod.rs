//! Wire Models
//!
//! JSON shapes exchanged with the backend. Field names follow the
//! backend's camelCase convention.

mod customer;
mod lookup;
mod order;
mod page;

pub use customer::{assign_ids, Customer, CustomerColumn};
pub use lookup::{Employee, Lookup, Product, Shipper};
pub use order::{
    CreateOrderCommand, CreateOrderDetail, Order, OrderDetail, OrderSummary, OrderSummaryColumn,
};
pub use page::{PageRequest, Paginated};
