//! Inventory service: load, decide, persist.
//!
//! Each operation loads the full record set fresh from the store, runs the
//! relevant agents, and (for mutations) writes the full set back. Nothing is
//! cached between operations.
//!
//! Batch operations decide each record independently: an oracle failure on
//! one record only routes that record to its fallback.

use std::sync::Arc;
use thiserror::Error;

use pantry_core::{InventoryRecord, RecordStore, StoreError};

use crate::advisory::Decision;
use crate::agents::{ForecastEngine, ReorderPolicy, StockMonitor, StockReconciler};
use crate::oracle::AdvisoryOracle;

/// Errors from the inventory service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a restock or sale.
#[derive(Debug, Clone, PartialEq)]
pub struct StockChange {
    /// The record as persisted
    pub record: InventoryRecord,

    /// Stock level before the event
    pub previous_stock: i64,

    /// How the new level was decided
    pub decision: Decision<i64>,
}

/// One line of the forecast and reorder report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderLine {
    pub product_id: String,
    pub product_name: String,
    pub current_stock: i64,
    pub forecast: Decision<i64>,
    pub reorder: Decision<i64>,
}

/// Wires the store to the four decision agents.
pub struct InventoryService<S> {
    store: S,
    reconciler: StockReconciler,
    forecaster: ForecastEngine,
    reorder: ReorderPolicy,
    monitor: StockMonitor,
}

impl<S: RecordStore> InventoryService<S> {
    /// Create a service whose agents share one oracle.
    pub fn new(store: S, oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self {
            store,
            reconciler: StockReconciler::new(oracle.clone()),
            forecaster: ForecastEngine::new(oracle.clone()),
            reorder: ReorderPolicy::new(oracle.clone()),
            monitor: StockMonitor::new(oracle),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All records, in persisted order.
    pub fn list(&self) -> Result<Vec<InventoryRecord>, ServiceError> {
        Ok(self.store.load_all()?)
    }

    /// Record a sale of `quantity` units and persist.
    pub fn record_sale(&self, product_id: &str, quantity: u32) -> Result<StockChange, ServiceError> {
        self.mutate(product_id, |reconciler, record| reconciler.apply_sale(record, quantity))
    }

    /// Restock `quantity` units and persist.
    pub fn restock(&self, product_id: &str, quantity: u32) -> Result<StockChange, ServiceError> {
        self.mutate(product_id, |reconciler, record| reconciler.apply_restock(record, quantity))
    }

    /// Forecast demand over `days` and suggest a reorder for every record.
    pub fn reorder_report(&self, days: u32, safety_stock: i64) -> Result<Vec<ReorderLine>, ServiceError> {
        let records = self.store.load_all()?;

        let lines = records
            .into_iter()
            .map(|record| {
                let forecast = self.forecaster.forecast(&record.sales_history, days);
                let reorder = self
                    .reorder
                    .suggest_reorder(record.current_stock, forecast.value, safety_stock);
                ReorderLine {
                    product_id: record.product_id,
                    product_name: record.product_name,
                    current_stock: record.current_stock,
                    forecast,
                    reorder,
                }
            })
            .collect();

        Ok(lines)
    }

    /// Records currently low on stock, in persisted order.
    pub fn low_stock_alerts(&self, threshold: i64) -> Result<Vec<InventoryRecord>, ServiceError> {
        let records = self.store.load_all()?;
        let flagged = self
            .monitor
            .check_low_stock(&records, threshold)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();

        tracing::info!(checked = records.len(), flagged = flagged.len(), threshold, "Low stock check complete");
        Ok(flagged)
    }

    fn mutate<F>(&self, product_id: &str, apply: F) -> Result<StockChange, ServiceError>
    where
        F: FnOnce(&StockReconciler, &mut InventoryRecord) -> Decision<i64>,
    {
        let mut records = self.store.load_all()?;
        let record = records
            .iter_mut()
            .find(|r| r.product_id == product_id)
            .ok_or_else(|| ServiceError::UnknownProduct(product_id.to_string()))?;

        let previous_stock = record.current_stock;
        let decision = apply(&self.reconciler, record);
        let updated = record.clone();

        self.store.save_all(&records)?;

        Ok(StockChange {
            record: updated,
            previous_stock,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OfflineOracle, OracleResult};
    use crate::testing::ScriptedOracle;
    use pantry_core::{CsvRecordStore, MemoryRecordStore};

    fn seed() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("P001", "Tomatoes", 25).with_history(vec![4, 6, 8]),
            InventoryRecord::new("P002", "Basil", 3),
            InventoryRecord::new("P003", "Flour", 10).with_history(vec![2]),
        ]
    }

    fn offline_service() -> InventoryService<MemoryRecordStore> {
        InventoryService::new(MemoryRecordStore::new(seed()), Arc::new(OfflineOracle))
    }

    #[test]
    fn test_record_sale_persists() {
        let service = offline_service();

        let change = service.record_sale("P001", 5).unwrap();

        assert_eq!(change.previous_stock, 25);
        assert_eq!(change.record.current_stock, 20);
        let stored = service.store().snapshot();
        assert_eq!(stored[0].current_stock, 20);
        assert_eq!(stored[0].sales_history, vec![4, 6, 8, 5]);
        assert_eq!(stored[1], seed()[1]);
    }

    #[test]
    fn test_restock_persists() {
        let service = offline_service();

        service.restock("P002", 12).unwrap();

        assert_eq!(service.store().snapshot()[1].current_stock, 15);
    }

    #[test]
    fn test_unknown_product_leaves_store_untouched() {
        let service = offline_service();

        let err = service.record_sale("P999", 1).unwrap_err();

        assert!(matches!(err, ServiceError::UnknownProduct(ref id) if id == "P999"));
        assert_eq!(service.store().snapshot(), seed());
    }

    #[test]
    fn test_reorder_report_fallback() {
        let service = offline_service();

        let report = service.reorder_report(7, 10).unwrap();

        assert_eq!(report.len(), 3);
        // P001: forecast 6 * 7 = 42, reorder 42 + 10 - 25 = 27
        assert_eq!(report[0].forecast.value, 42);
        assert_eq!(report[0].reorder.value, 27);
        // P002: no history, reorder 0 + 10 - 3 = 7
        assert_eq!(report[1].forecast.value, 0);
        assert_eq!(report[1].reorder.value, 7);
        // P003: forecast 14, reorder 14
        assert_eq!(report[2].reorder.value, 14);
    }

    #[test]
    fn test_reorder_report_isolates_failures() {
        // P001 forecast and reorder answered, P002 forecast fails, then replies resume.
        let oracle = Arc::new(ScriptedOracle::new([
            OracleResult::Text("30".to_string()),
            OracleResult::Text("5".to_string()),
            OracleResult::Unavailable,
            OracleResult::Text("not sure".to_string()),
            OracleResult::Text("1".to_string()),
            OracleResult::Text("2".to_string()),
        ]));
        let service = InventoryService::new(MemoryRecordStore::new(seed()), oracle);

        let report = service.reorder_report(7, 10).unwrap();

        assert_eq!((report[0].forecast.value, report[0].reorder.value), (30, 5));
        assert!(!report[1].forecast.is_from_oracle());
        assert_eq!(report[1].reorder.value, 7);
        assert_eq!((report[2].forecast.value, report[2].reorder.value), (1, 2));
    }

    #[test]
    fn test_low_stock_alerts() {
        let service = offline_service();

        let alerts = service.low_stock_alerts(10).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_id, "P002");
    }

    #[test]
    fn test_reload_between_operations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        let store = CsvRecordStore::new(&path);
        store.save_all(&seed()).unwrap();
        let service = InventoryService::new(store, Arc::new(OfflineOracle));

        service.record_sale("P003", 4).unwrap();
        // Edit behind the service's back; the next operation must see it.
        let external = CsvRecordStore::new(&path);
        let mut records = external.load_all().unwrap();
        records[2].current_stock = 100;
        external.save_all(&records).unwrap();

        let change = service.restock("P003", 1).unwrap();
        assert_eq!(change.previous_stock, 100);
        assert_eq!(service.list().unwrap()[2].sales_history, vec![2, 4]);
    }

    #[test]
    fn test_store_format_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        std::fs::write(&path, "product_id,product_name,current_stock,sales_history\nP1,Salt,many,\n").unwrap();
        let service = InventoryService::new(CsvRecordStore::new(&path), Arc::new(OfflineOracle));

        assert!(matches!(
            service.low_stock_alerts(10),
            Err(ServiceError::Store(StoreError::Format { .. }))
        ));
    }
}
