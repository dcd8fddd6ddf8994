//! Order shapes: summaries, full orders and the creation payload.

use serde::{Deserialize, Serialize};

use crate::listing::{SortKey, Sortable};

/// One row of a customer's order history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: i64,
    #[serde(default)]
    pub required_date: Option<String>,
    #[serde(default)]
    pub shipped_date: Option<String>,
    #[serde(default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub ship_address: Option<String>,
    #[serde(default)]
    pub ship_city: Option<String>,
}

/// Sortable columns of the order summary table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum OrderSummaryColumn {
    OrderId,
    RequiredDate,
    ShippedDate,
    ShipName,
    ShipAddress,
    ShipCity,
}

impl OrderSummaryColumn {
    pub const ALL: [OrderSummaryColumn; 6] = [
        OrderSummaryColumn::OrderId,
        OrderSummaryColumn::RequiredDate,
        OrderSummaryColumn::ShippedDate,
        OrderSummaryColumn::ShipName,
        OrderSummaryColumn::ShipAddress,
        OrderSummaryColumn::ShipCity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderSummaryColumn::OrderId => "Order #",
            OrderSummaryColumn::RequiredDate => "Required",
            OrderSummaryColumn::ShippedDate => "Shipped",
            OrderSummaryColumn::ShipName => "Ship Name",
            OrderSummaryColumn::ShipAddress => "Address",
            OrderSummaryColumn::ShipCity => "City",
        }
    }
}

impl Sortable for OrderSummary {
    type Column = OrderSummaryColumn;

    fn sort_key(&self, column: OrderSummaryColumn) -> SortKey {
        match column {
            OrderSummaryColumn::OrderId => SortKey::Integer(self.order_id),
            OrderSummaryColumn::RequiredDate => SortKey::date(self.required_date.as_deref()),
            OrderSummaryColumn::ShippedDate => SortKey::date(self.shipped_date.as_deref()),
            OrderSummaryColumn::ShipName => SortKey::optional_text(self.ship_name.as_deref()),
            OrderSummaryColumn::ShipAddress => {
                SortKey::optional_text(self.ship_address.as_deref())
            }
            OrderSummaryColumn::ShipCity => SortKey::optional_text(self.ship_city.as_deref()),
        }
    }
}

/// A line of a full order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub unit_price: f64,
    pub qty: i32,
    /// Percentage, 0-100
    #[serde(default)]
    pub discount: f64,
}

/// A full order with its lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    #[serde(default)]
    pub cust_id: Option<i64>,
    #[serde(default)]
    pub emp_id: i64,
    #[serde(default)]
    pub shipper_id: i64,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub required_date: Option<String>,
    #[serde(default)]
    pub shipped_date: Option<String>,
    #[serde(default)]
    pub freight: f64,
    #[serde(default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub ship_address: Option<String>,
    #[serde(default)]
    pub ship_city: Option<String>,
    #[serde(default)]
    pub ship_country: Option<String>,
    #[serde(default)]
    pub details: Vec<OrderDetail>,
}

/// Payload for `POST /Orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<i64>,
    pub emp_id: i64,
    pub shipper_id: i64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_country: String,
    pub order_date: Option<String>,
    pub required_date: Option<String>,
    pub shipped_date: Option<String>,
    pub freight: f64,
    pub details: Vec<CreateOrderDetail>,
}

/// One line of a [`CreateOrderCommand`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDetail {
    pub product_id: i64,
    pub unit_price: f64,
    pub qty: i32,
    /// Percentage, 0-100
    pub discount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialize_with_details() {
        let json = r#"{
            "orderId": 10248,
            "custId": 85,
            "empId": 5,
            "shipperId": 3,
            "orderDate": "2006-07-04T00:00:00",
            "requiredDate": "2006-08-01T00:00:00",
            "freight": 32.38,
            "shipName": "Ship to 85-B",
            "details": [
                {"productId": 11, "productName": "Queso Cabrales", "unitPrice": 14.0, "qty": 12, "discount": 0.0}
            ]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, 10248);
        assert_eq!(order.cust_id, Some(85));
        assert_eq!(order.shipped_date, None);
        assert_eq!(order.details.len(), 1);
        assert_eq!(order.details[0].product_name.as_deref(), Some("Queso Cabrales"));
    }

    #[test]
    fn test_create_command_wire_names() {
        let command = CreateOrderCommand {
            cust_id: None,
            emp_id: 1,
            shipper_id: 2,
            ship_name: "Ship".to_string(),
            ship_address: String::new(),
            ship_city: String::new(),
            ship_country: String::new(),
            order_date: Some("2024-01-01T00:00:00.000Z".to_string()),
            required_date: None,
            shipped_date: None,
            freight: 1.5,
            details: vec![CreateOrderDetail {
                product_id: 3,
                unit_price: 4.0,
                qty: 5,
                discount: 0.0,
            }],
        };

        let value = serde_json::to_value(&command).unwrap();
        assert!(value.get("custId").is_none());
        assert_eq!(value["empId"], 1);
        assert_eq!(value["shipperId"], 2);
        assert_eq!(value["orderDate"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["details"][0]["productId"], 3);
    }
}
