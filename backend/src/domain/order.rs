//! Order and special-request snapshots embedded in notifications.
//!
//! Snapshots are immutable copies of the triggering entity at the time the
//! notification was produced; later changes to the order never reach
//! notifications already delivered.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Line item inside an order or special request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product family, e.g. `Coffee` or `Meat`; selects the cooperative.
    pub product_type: String,
    pub product_name: String,
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
}

/// Client order at the time of the triggering event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub order_id: String,
    /// Full name of the ordering client.
    pub client: String,
    pub status: String,
    #[serde(default)]
    pub date: String,
    pub items: Vec<OrderItem>,
}

impl OrderSnapshot {
    /// Distinct product types across the order's items, in first-seen order.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{OrderItem, OrderSnapshot};
    ///
    /// let item = |kind: &str| OrderItem {
    ///     product_type: kind.to_owned(),
    ///     product_name: format!("{kind} lot"),
    ///     quantity: 1.0,
    ///     price: 0.0,
    /// };
    /// let order = OrderSnapshot {
    ///     order_id: "o-1".to_owned(),
    ///     client: "A B".to_owned(),
    ///     status: "Pending".to_owned(),
    ///     date: String::new(),
    ///     items: vec![item("Coffee"), item("Meat"), item("Coffee")],
    /// };
    /// assert_eq!(order.product_types(), vec!["Coffee", "Meat"]);
    /// ```
    #[must_use]
    pub fn product_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            let kind = item.product_type.as_str();
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        seen
    }
}

/// Special request (custom order) at the time of the triggering event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialRequestSnapshot {
    pub request_id: String,
    /// Full name of the requesting user.
    pub requester: String,
    pub status: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub products: Vec<OrderItem>,
}
