//! Dialog Controllers
//!
//! State behind the two modal dialogs opened from a customer row: the
//! customer's order history and the new-order form. Like [`Listing`], each
//! has a synchronous state machine (`begin_*`/`finish_*`) that a display
//! layer can drive itself, plus `async` helpers that fetch and apply in
//! one call.
//!
//! [`Listing`]: crate::listing::Listing

mod new_order;
mod orders;

pub use new_order::{DraftError, LineItem, NewOrderDialog, OrderDraft, CANONICAL_TIMESTAMP};
pub use orders::OrdersDialog;

use crate::models::Customer;

/// The customer a dialog was opened for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: i64,
    pub name: String,
}

impl From<&Customer> for CustomerRef {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.customer_id,
            name: customer.customer_name.clone(),
        }
    }
}
