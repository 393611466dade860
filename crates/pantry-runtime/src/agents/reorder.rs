//! Reorder quantity suggestions.

use std::sync::Arc;

use pantry_core::fallback;

use crate::advisory::{consult, parse_integer, Decision};
use crate::oracle::AdvisoryOracle;
use crate::prompts;

/// Suggests how many units to reorder.
///
/// The fallback never suggests a negative quantity. A parsed oracle reply
/// is accepted as-is, negative or not.
#[derive(Clone)]
pub struct ReorderPolicy {
    oracle: Arc<dyn AdvisoryOracle>,
}

impl ReorderPolicy {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self { oracle }
    }

    /// Units needed to cover `forecasted_sales` plus `safety_stock`.
    pub fn suggest_reorder(
        &self,
        current_stock: i64,
        forecasted_sales: i64,
        safety_stock: i64,
    ) -> Decision<i64> {
        let request = prompts::reorder_request(current_stock, forecasted_sales, safety_stock);
        let decision = consult(self.oracle.as_ref(), &request, parse_integer, || {
            fallback::shortfall_reorder(current_stock, forecasted_sales, safety_stock)
        });

        tracing::debug!(
            current_stock,
            forecasted_sales,
            safety_stock,
            reorder = decision.value,
            source = %decision.source,
            "Reorder suggested"
        );
        decision
    }
}
