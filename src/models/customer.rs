//! Customer rows as served by the predictions endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::listing::{SortKey, Sortable};

/// A customer with its last and next predicted order dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Row identifier. Absent on the wire for most backends and
    /// synthesized from position after a fetch (see [`assign_ids`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Backend key, used to look up the customer's orders
    #[serde(default)]
    pub customer_id: i64,
    pub customer_name: String,
    #[serde(default)]
    pub last_order_date: Option<String>,
    #[serde(default)]
    pub next_predicted_order: Option<String>,
}

impl Customer {
    /// Row identifier, empty until ids have been assigned
    pub fn row_id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Fill in missing row ids as `{prefix}_{n}` (1-based position).
///
/// Ids the backend already supplied are kept. A synthesized id never
/// collides with another id in the same collection.
pub fn assign_ids(customers: &mut [Customer], prefix: &str) {
    let mut taken: HashSet<String> = customers.iter().filter_map(|c| c.id.clone()).collect();

    for (index, customer) in customers.iter_mut().enumerate() {
        if customer.id.is_some() {
            continue;
        }

        let mut candidate = format!("{}_{}", prefix, index + 1);
        let mut suffix = 1;
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}_{}_{}", prefix, index + 1, suffix);
        }

        taken.insert(candidate.clone());
        customer.id = Some(candidate);
    }
}

/// Sortable columns of the customers table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum CustomerColumn {
    Id,
    CustomerId,
    Name,
    LastOrderDate,
    NextPredictedOrder,
}

impl CustomerColumn {
    pub const ALL: [CustomerColumn; 5] = [
        CustomerColumn::Id,
        CustomerColumn::CustomerId,
        CustomerColumn::Name,
        CustomerColumn::LastOrderDate,
        CustomerColumn::NextPredictedOrder,
    ];

    /// Column header text
    pub fn label(self) -> &'static str {
        match self {
            CustomerColumn::Id => "Row",
            CustomerColumn::CustomerId => "Customer #",
            CustomerColumn::Name => "Customer",
            CustomerColumn::LastOrderDate => "Last Order",
            CustomerColumn::NextPredictedOrder => "Next Predicted Order",
        }
    }
}

impl Sortable for Customer {
    type Column = CustomerColumn;

    fn sort_key(&self, column: CustomerColumn) -> SortKey {
        match column {
            CustomerColumn::Id => SortKey::optional_text(self.id.as_deref()),
            CustomerColumn::CustomerId => SortKey::Integer(self.customer_id),
            CustomerColumn::Name => SortKey::text(&self.customer_name),
            CustomerColumn::LastOrderDate => SortKey::date(self.last_order_date.as_deref()),
            CustomerColumn::NextPredictedOrder => {
                SortKey::date(self.next_predicted_order.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: Option<&str>, name: &str) -> Customer {
        Customer {
            id: id.map(str::to_string),
            customer_id: 0,
            customer_name: name.to_string(),
            last_order_date: None,
            next_predicted_order: None,
        }
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "customerId": 7,
            "customerName": "Around the Horn",
            "lastOrderDate": "2008-04-28T00:00:00",
            "nextPredictedOrder": "2008-06-10T00:00:00"
        }"#;

        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.id, None);
        assert_eq!(customer.customer_id, 7);
        assert_eq!(customer.customer_name, "Around the Horn");
        assert_eq!(customer.next_predicted_order.as_deref(), Some("2008-06-10T00:00:00"));
    }

    #[test]
    fn test_assign_ids_by_position() {
        let mut customers = vec![customer(None, "a"), customer(None, "b")];
        assign_ids(&mut customers, "customer");

        assert_eq!(customers[0].row_id(), "customer_1");
        assert_eq!(customers[1].row_id(), "customer_2");
    }

    #[test]
    fn test_assign_ids_keeps_existing_and_stays_unique() {
        let mut customers = vec![
            customer(Some("search_2"), "a"),
            customer(None, "b"),
            customer(None, "c"),
        ];
        assign_ids(&mut customers, "search");

        assert_eq!(customers[0].row_id(), "search_2");
        assert_eq!(customers[1].row_id(), "search_2_2");
        assert_eq!(customers[2].row_id(), "search_3");

        let unique: HashSet<&str> = customers.iter().map(Customer::row_id).collect();
        assert_eq!(unique.len(), customers.len());
    }
}
