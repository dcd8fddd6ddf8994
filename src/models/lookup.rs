//! Selection-list entities for the new-order form.

use serde::{Deserialize, Serialize};

/// Anything that can populate a `<select>`: an id and a display name
pub trait Lookup {
    fn id(&self) -> i64;
    fn display_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(alias = "employeeId")]
    pub emp_id: i64,
    #[serde(alias = "name")]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipper {
    pub shipper_id: i64,
    #[serde(alias = "name")]
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    /// List price, used to prefill a line item
    #[serde(default)]
    pub unit_price: Option<f64>,
}

impl Lookup for Employee {
    fn id(&self) -> i64 {
        self.emp_id
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }
}

impl Lookup for Shipper {
    fn id(&self) -> i64 {
        self.shipper_id
    }

    fn display_name(&self) -> &str {
        &self.company_name
    }
}

impl Lookup for Product {
    fn id(&self) -> i64 {
        self.product_id
    }

    fn display_name(&self) -> &str {
        &self.product_name
    }
}
