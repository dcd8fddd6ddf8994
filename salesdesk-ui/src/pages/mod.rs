//! Pages
//!
//! Top-level page components for each route.

pub mod customers;
pub mod settings;

pub use customers::Customers;
pub use settings::Settings;
