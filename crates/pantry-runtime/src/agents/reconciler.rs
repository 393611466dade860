//! Stock reconciliation for restock and sale events.

use std::sync::Arc;

use pantry_core::{fallback, InventoryRecord};

use crate::advisory::{consult, parse_integer, Decision};
use crate::oracle::AdvisoryOracle;
use crate::prompts;

/// Applies restock and sale events to a record.
///
/// An accepted oracle reply *replaces* `current_stock`: the oracle is asked
/// for the full new level, not a delta, and nothing checks that its answer
/// is consistent with the event. Only a reply that fails to parse as an
/// integer falls back to plain addition or subtraction.
#[derive(Clone)]
pub struct StockReconciler {
    oracle: Arc<dyn AdvisoryOracle>,
}

impl StockReconciler {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self { oracle }
    }

    /// Receive `quantity` units.
    pub fn apply_restock(&self, record: &mut InventoryRecord, quantity: u32) -> Decision<i64> {
        let request = prompts::restock_request(record, quantity);
        let current = record.current_stock;
        let decision = consult(self.oracle.as_ref(), &request, parse_integer, || {
            fallback::restock_level(current, quantity)
        });

        tracing::info!(
            product_id = %record.product_id,
            quantity,
            from = current,
            to = decision.value,
            source = %decision.source,
            "Restock applied"
        );
        record.current_stock = decision.value;
        decision
    }

    /// Sell `quantity` units. The sale is appended to the history whichever
    /// path set the new stock level.
    pub fn apply_sale(&self, record: &mut InventoryRecord, quantity: u32) -> Decision<i64> {
        let request = prompts::sale_request(record, quantity);
        let current = record.current_stock;
        let decision = consult(self.oracle.as_ref(), &request, parse_integer, || {
            fallback::sale_level(current, quantity)
        });

        tracing::info!(
            product_id = %record.product_id,
            quantity,
            from = current,
            to = decision.value,
            source = %decision.source,
            "Sale applied"
        );
        record.current_stock = decision.value;
        record.sales_history.push(quantity);
        decision
    }
}
