//! # pantry-runtime
//!
//! LLM-advised inventory decisions for Pantry.
//!
//! Every stock-mutating or decision-making operation follows one routine:
//! ask the [`AdvisoryOracle`] for a suggested value, validate the reply, and
//! fall back to the deterministic formula from `pantry-core` when the oracle
//! is absent, errors, or answers with something unusable.
//!
//! ## Important
//!
//! The oracle is optional. Without a credential every agent runs purely on
//! its fallback formula, and the results are fully deterministic.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pantry_core::CsvRecordStore;
//! use pantry_runtime::{oracle_from_config, InventoryService, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml_file("pantry.yaml")?;
//! let oracle = oracle_from_config(&config)?;
//! let service = InventoryService::new(CsvRecordStore::new(&config.inventory_file), oracle);
//!
//! service.record_sale("P001", 4)?;
//! for line in service.reorder_report(config.forecast_days, config.safety_stock())? {
//!     println!("{}: reorder {}", line.product_name, line.reorder.value);
//! }
//! ```

pub mod advisory;
pub mod agents;
pub mod config;
pub mod oracle;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use advisory::{consult, Decision, DecisionSource, FallbackReason};
pub use agents::{ForecastEngine, ReorderPolicy, StockMonitor, StockReconciler};
pub use config::{ConfigError, OracleConfig, RuntimeConfig};
pub use oracle::{
    oracle_from_config, AdvisoryOracle, AgentKind, DecisionRequest, OfflineOracle, OracleResult,
    ProviderOracle,
};
pub use orchestrator::{InventoryService, ReorderLine, ServiceError, StockChange};
pub use usage::OracleUsage;
