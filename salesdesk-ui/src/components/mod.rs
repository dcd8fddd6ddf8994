//! UI Components
//!
//! Reusable Leptos components for the customer and order views.

pub mod loading;
pub mod nav;
pub mod new_order_dialog;
pub mod orders_dialog;
pub mod pager;
pub mod toast;

pub use loading::{InlineLoading, Loading};
pub use nav::Nav;
pub use new_order_dialog::NewOrderModal;
pub use orders_dialog::OrdersModal;
pub use pager::{PageInfo, Pager, SortHeader};
pub use toast::Toast;

/// Date part of a backend timestamp, or `-`
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(salesdesk::listing::parse_date)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
