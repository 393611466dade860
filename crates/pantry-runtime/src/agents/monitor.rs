//! Low-stock classification.

use std::sync::Arc;

use pantry_core::{fallback, InventoryRecord};

use crate::advisory::{consult, parse_affirmative};
use crate::oracle::AdvisoryOracle;
use crate::prompts;

/// Flags records that are low on stock.
///
/// Each record gets its own yes/no round-trip. Any reply counts: one that
/// starts with "y" flags the record, anything else clears it. The strict
/// `current_stock < threshold` test applies only when the oracle is
/// unavailable.
#[derive(Clone)]
pub struct StockMonitor {
    oracle: Arc<dyn AdvisoryOracle>,
}

impl StockMonitor {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self { oracle }
    }

    /// Whether one record is low on stock.
    pub fn is_low_stock(&self, record: &InventoryRecord, threshold: i64) -> bool {
        let request = prompts::low_stock_request(record, threshold);
        let decision = consult(self.oracle.as_ref(), &request, parse_affirmative, || {
            fallback::is_below_threshold(record.current_stock, threshold)
        });

        tracing::debug!(
            product_id = %record.product_id,
            current_stock = record.current_stock,
            threshold,
            low = decision.value,
            source = %decision.source,
            "Stock level checked"
        );
        decision.value
    }

    /// The records flagged low, in input order.
    pub fn check_low_stock<'a>(
        &self,
        records: &'a [InventoryRecord],
        threshold: i64,
    ) -> Vec<&'a InventoryRecord> {
        records
            .iter()
            .filter(|record| self.is_low_stock(record, threshold))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OfflineOracle, OracleResult};
    use crate::testing::ScriptedOracle;

    fn records() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("P001", "Tomatoes", 3),
            InventoryRecord::new("P002", "Basil", 10),
            InventoryRecord::new("P003", "Flour", 40),
            InventoryRecord::new("P004", "Salt", -1),
        ]
    }

    fn ids(flagged: &[&InventoryRecord]) -> Vec<String> {
        flagged.iter().map(|r| r.product_id.clone()).collect()
    }

    #[test]
    fn test_fallback_is_strict_and_ordered() {
        let monitor = StockMonitor::new(Arc::new(OfflineOracle));
        let records = records();

        let flagged = monitor.check_low_stock(&records, 10);

        // P002 sits exactly at the threshold and is not flagged
        assert_eq!(ids(&flagged), vec!["P001", "P004"]);
    }

    #[test]
    fn test_oracle_answers_override_threshold() {
        let oracle = Arc::new(ScriptedOracle::replies(&["no", "Yes", "yes, order more", "No."]));
        let monitor = StockMonitor::new(oracle.clone());
        let records = records();

        let flagged = monitor.check_low_stock(&records, 10);

        assert_eq!(ids(&flagged), vec!["P002", "P003"]);
        assert_eq!(oracle.requests().len(), 4);
    }

    #[test]
    fn test_unrecognised_reply_means_not_low() {
        let monitor = StockMonitor::new(Arc::new(ScriptedOracle::replies(&["maybe"])));
        let record = InventoryRecord::new("P001", "Tomatoes", 0);

        assert!(!monitor.is_low_stock(&record, 10));
    }

    #[test]
    fn test_each_record_decided_independently() {
        // Second call fails; only that record uses the threshold.
        let oracle = Arc::new(ScriptedOracle::new([
            OracleResult::Text("no".to_string()),
            OracleResult::Unavailable,
            OracleResult::Text("yes".to_string()),
            OracleResult::Text("no".to_string()),
        ]));
        let monitor = StockMonitor::new(oracle);
        let records = vec![
            InventoryRecord::new("P001", "Tomatoes", 3),
            InventoryRecord::new("P002", "Basil", 2),
            InventoryRecord::new("P003", "Flour", 40),
            InventoryRecord::new("P004", "Salt", 1),
        ];

        let flagged = monitor.check_low_stock(&records, 10);

        assert_eq!(ids(&flagged), vec!["P002", "P003"]);
    }

    #[test]
    fn test_empty_input() {
        let monitor = StockMonitor::new(Arc::new(OfflineOracle));
        assert!(monitor.check_low_stock(&[], 10).is_empty());
    }
}
