//! Flat-file persistence for the inventory record set.
//!
//! The store loads every record and rewrites every record. Operations load
//! fresh, mutate in memory, and persist in full, so the backing file is the
//! only source of truth between operations.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::record::InventoryRecord;

/// Column order of the persisted file.
pub const HEADER: [&str; 4] = ["product_id", "product_name", "current_stock", "sales_history"];

/// Separator between entries of the persisted sales history.
pub const HISTORY_DELIMITER: char = '|';

/// Errors that can occur when loading or saving records.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Inventory file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access inventory file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record at row {row}: {message}")]
    Format { row: usize, message: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Loads and persists the full record set.
///
/// Implementations need not be safe against concurrent writers; last writer
/// wins.
pub trait RecordStore {
    /// Load every record, in persisted order.
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Replace the entire backing store with `records`.
    fn save_all(&self, records: &[InventoryRecord]) -> Result<(), StoreError>;
}

/// CSV-backed record store.
///
/// Rows are `product_id,product_name,current_stock,sales_history`, with the
/// history written as `|`-joined integers (empty when there is no history).
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    /// Create a store over the given file. The file is not touched until the
    /// first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for CsvRecordStore {
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(self.path.clone())
            } else {
                StoreError::Io(e)
            }
        })?;

        let records = read_records(file)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded inventory");
        Ok(records)
    }

    fn save_all(&self, records: &[InventoryRecord]) -> Result<(), StoreError> {
        replace_via_staging(&self.path, &self.staging_path(), |file| write_records(file, records))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Saved inventory");
        Ok(())
    }
}

/// Write `staging` with `write`, then rename it over `target`.
///
/// On any failure the staging file is removed and `target` is left as it was.
fn replace_via_staging<F>(target: &Path, staging: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(File) -> Result<(), StoreError>,
{
    let result = File::create(staging)
        .map_err(StoreError::from)
        .and_then(write)
        .and_then(|()| fs::rename(staging, target).map_err(StoreError::from));

    if result.is_err() {
        match fs::remove_file(staging) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging file");
            }
        }
    }
    result
}

/// Parse a full record set from CSV text with a header row.
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<InventoryRecord>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
    };
    let id_col = column(HEADER[0])?;
    let name_col = column(HEADER[1])?;
    let stock_col = column(HEADER[2])?;
    let history_col = column(HEADER[3])?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|e| match e.kind() {
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => StoreError::Format {
                row: row_number,
                message: format!("expected {} fields, found {}", expected_len, len),
            },
            _ => StoreError::Csv(e),
        })?;
        let field = |col: usize| row.get(col).unwrap_or("");

        let product_id = field(id_col).to_string();
        if !seen.insert(product_id.clone()) {
            return Err(StoreError::Format {
                row: row_number,
                message: format!("duplicate product_id '{}'", product_id),
            });
        }

        let current_stock = field(stock_col).trim().parse::<i64>().map_err(|_| StoreError::Format {
            row: row_number,
            message: format!("current_stock '{}' is not an integer", field(stock_col)),
        })?;

        let sales_history = parse_history(field(history_col)).map_err(|entry| StoreError::Format {
            row: row_number,
            message: format!("sales_history entry '{}' is not a non-negative integer", entry),
        })?;

        records.push(InventoryRecord {
            product_id,
            product_name: field(name_col).to_string(),
            current_stock,
            sales_history,
        });
    }

    Ok(records)
}

/// Write a full record set as CSV with a header row.
pub fn write_records<W: io::Write>(writer: W, records: &[InventoryRecord]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for record in records {
        let stock = record.current_stock.to_string();
        let history = format_history(&record.sales_history);
        writer.write_record([
            record.product_id.as_str(),
            record.product_name.as_str(),
            stock.as_str(),
            history.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Parse a `|`-joined history. Empty segments are skipped; the offending
/// segment is returned on failure.
fn parse_history(raw: &str) -> Result<Vec<u32>, String> {
    raw.split(HISTORY_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(|_| s.to_string()))
        .collect()
}

fn format_history(history: &[u32]) -> String {
    history
        .iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join(&HISTORY_DELIMITER.to_string())
}

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<InventoryRecord>>,
}

impl MemoryRecordStore {
    /// Create a store seeded with `records`.
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Snapshot of the current contents.
    pub fn snapshot(&self) -> Vec<InventoryRecord> {
        self.records.lock().clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn save_all(&self, records: &[InventoryRecord]) -> Result<(), StoreError> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "product_id,product_name,current_stock,sales_history\n\
                          P001,Tomatoes,25,4|6|8\n\
                          P002,\"Olive Oil, Extra Virgin\",3,\n";

    fn sample_records() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("P001", "Tomatoes", 25).with_history(vec![4, 6, 8]),
            InventoryRecord::new("P002", "Olive Oil, Extra Virgin", 3),
            InventoryRecord::new("P003", "Flour \"00\"", -2).with_history(vec![0, 12]),
        ]
    }

    #[test]
    fn test_read_records() {
        let records = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sales_history, vec![4, 6, 8]);
        assert_eq!(records[1].product_name, "Olive Oil, Extra Virgin");
        assert!(records[1].sales_history.is_empty());
    }

    #[test]
    fn test_read_accepts_reordered_columns() {
        let csv = "current_stock,sales_history,product_id,product_name\n7,1|2,P9,Salt\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![InventoryRecord::new("P9", "Salt", 7).with_history(vec![1, 2])]);
    }

    #[test]
    fn test_non_integer_stock_is_format_error() {
        let csv = "product_id,product_name,current_stock,sales_history\nP001,Tomatoes,lots,\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Format { row: 1, .. }));
        assert!(err.to_string().contains("current_stock"));
    }

    #[test]
    fn test_malformed_history_is_format_error() {
        let csv = "product_id,product_name,current_stock,sales_history\n\
                   P001,Tomatoes,5,1|2\n\
                   P002,Basil,5,3|x\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            StoreError::Format { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("'x'"));
            }
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_history_entry_is_format_error() {
        let csv = "product_id,product_name,current_stock,sales_history\nP001,Tomatoes,5,3|-1\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn test_duplicate_product_id_is_format_error() {
        let csv = "product_id,product_name,current_stock,sales_history\n\
                   P001,Tomatoes,5,\n\
                   P001,Tomatoes again,6,\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate product_id"));
    }

    #[test]
    fn test_wrong_column_count_is_format_error() {
        let csv = "product_id,product_name,current_stock,sales_history\n\
                   P001,Tomatoes,5,1|2\n\
                   P002,Basil,5\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(StoreError::Format { row: 2, .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let csv = "product_id,product_name,current_stock\nP001,Tomatoes,5\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(StoreError::MissingColumn(c)) if c == "sales_history"
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("absent.csv"));
        assert!(matches!(store.load_all(), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("inventory.csv"));

        store.save_all(&sample_records()).unwrap();
        assert_eq!(store.load_all().unwrap(), sample_records());
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_failed_write_removes_staging_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path().join("inventory.csv"));
        store.save_all(&sample_records()).unwrap();
        let staging = store.staging_path();

        let result = replace_via_staging(&store.path, &staging, |mut file| {
            file.write_all(b"product_id,product_name\nP0")?;
            Err(StoreError::Format {
                row: 1,
                message: "interrupted".to_string(),
            })
        });

        assert!(matches!(result, Err(StoreError::Format { row: 1, .. })));
        assert!(!staging.exists());
        assert_eq!(store.load_all().unwrap(), sample_records());
    }

    #[test]
    fn test_resave_without_mutation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, SAMPLE).unwrap();
        let store = CsvRecordStore::new(&path);

        store.save_all(&store.load_all().unwrap()).unwrap();
        let first = fs::read(&path).unwrap();
        store.save_all(&store.load_all().unwrap()).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load_all().unwrap(), read_records(SAMPLE.as_bytes()).unwrap());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryRecordStore::new(sample_records());
        let mut records = store.load_all().unwrap();
        records[0].current_stock = 99;
        store.save_all(&records).unwrap();
        assert_eq!(store.snapshot()[0].current_stock, 99);
    }

    proptest! {
        #[test]
        fn prop_csv_round_trip_preserves_records(
            rows in proptest::collection::vec(
                ("[A-Z][0-9]{1,4}", "[ -~]{0,20}", -1_000i64..1_000, proptest::collection::vec(0u32..100, 0..8)),
                0..10,
            )
        ) {
            let mut seen = HashSet::new();
            let records: Vec<InventoryRecord> = rows
                .into_iter()
                .filter(|(id, ..)| seen.insert(id.clone()))
                .map(|(id, name, stock, history)| {
                    InventoryRecord::new(id, name, stock).with_history(history)
                })
                .collect();

            let mut buf = Vec::new();
            write_records(&mut buf, &records).unwrap();
            prop_assert_eq!(read_records(buf.as_slice()).unwrap(), records);
        }
    }
}
