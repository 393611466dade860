//! Decision agents.
//!
//! Each agent holds nothing but the oracle capability; thresholds, horizons
//! and safety stock are passed per call. Every operation is one oracle
//! round-trip routed through [`consult`](crate::advisory::consult).

mod forecast;
mod monitor;
mod reconciler;
mod reorder;

pub use forecast::ForecastEngine;
pub use monitor::StockMonitor;
pub use reconciler::StockReconciler;
pub use reorder::ReorderPolicy;
