//! # pantry-core
//!
//! Deterministic inventory layer for Pantry.
//!
//! This crate holds everything that does not need an LLM:
//! - [`InventoryRecord`], the unit of the record set
//! - [`RecordStore`] and its flat-file [`CsvRecordStore`]
//! - the [`fallback`] formulas used whenever advice is unavailable
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: fallback formulas are pure integer arithmetic
//! 2. **No LLM calls**: advisory reconciliation lives in `pantry-runtime`
//! 3. **Order-preserving**: records and sales histories round-trip in order
//!
//! ## Example
//!
//! ```rust,ignore
//! use pantry_core::{CsvRecordStore, RecordStore, fallback};
//!
//! let store = CsvRecordStore::new("restaurant_inventory.csv");
//! for record in store.load_all()? {
//!     let forecast = fallback::moving_average_forecast(&record.sales_history, 7);
//!     println!("{}: {}", record.product_name, forecast);
//! }
//! ```

pub mod fallback;
pub mod record;
pub mod store;

// Re-export main types at crate root
pub use record::InventoryRecord;
pub use store::{CsvRecordStore, MemoryRecordStore, RecordStore, StoreError};
