//! Inventory record type.

use serde::{Deserialize, Serialize};

/// One product line in the inventory.
///
/// `current_stock` is signed: reconciliation never clamps, so a sale larger
/// than the stock on hand leaves the record negative until it is restocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Stable key, unique within one load of the record set
    pub product_id: String,

    /// Display label
    pub product_name: String,

    /// Units on hand
    pub current_stock: i64,

    /// Quantity of every recorded sale, oldest first
    #[serde(default)]
    pub sales_history: Vec<u32>,
}

impl InventoryRecord {
    /// Create a record with an empty sales history.
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>, current_stock: i64) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            current_stock,
            sales_history: Vec::new(),
        }
    }

    /// Replace the sales history.
    pub fn with_history(mut self, sales_history: impl Into<Vec<u32>>) -> Self {
        self.sales_history = sales_history.into();
        self
    }
}
