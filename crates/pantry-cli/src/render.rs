//! Plain-text rendering shared by the menu and the one-shot commands.

use std::io::{self, Write};

use pantry_core::InventoryRecord;
use pantry_runtime::{ReorderLine, StockChange};

pub fn inventory<W: Write>(out: &mut W, records: &[InventoryRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "Inventory is empty.");
    }
    for record in records {
        writeln!(
            out,
            "{}: {} | Stock: {} | Sales History: {:?}",
            record.product_id, record.product_name, record.current_stock, record.sales_history
        )?;
    }
    Ok(())
}

pub fn stock_change<W: Write>(out: &mut W, verb: &str, change: &StockChange) -> io::Result<()> {
    writeln!(
        out,
        "{} {}: stock {} -> {} ({})",
        verb,
        change.record.product_name,
        change.previous_stock,
        change.record.current_stock,
        change.decision.source
    )
}

pub fn reorder_report<W: Write>(out: &mut W, lines: &[ReorderLine], days: u32) -> io::Result<()> {
    for line in lines {
        writeln!(
            out,
            "{}: Forecast next {} days = {}, Suggested reorder = {}",
            line.product_name, days, line.forecast.value, line.reorder.value
        )?;
    }
    Ok(())
}

pub fn low_stock_alerts<W: Write>(out: &mut W, flagged: &[InventoryRecord]) -> io::Result<()> {
    if flagged.is_empty() {
        return writeln!(out, "No products are below the low stock threshold.");
    }
    for record in flagged {
        writeln!(
            out,
            "ALERT: {} (ID: {}) is low on stock: {}",
            record.product_name, record.product_id, record.current_stock
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_inventory_line() {
        let records = vec![InventoryRecord::new("P001", "Tomatoes", 25).with_history(vec![4, 6])];
        let text = render(|out| inventory(out, &records));
        assert_eq!(text, "P001: Tomatoes | Stock: 25 | Sales History: [4, 6]\n");
    }

    #[test]
    fn test_no_alerts() {
        let text = render(|out| low_stock_alerts(out, &[]));
        assert_eq!(text, "No products are below the low stock threshold.\n");
    }

    #[test]
    fn test_alert_line() {
        let flagged = vec![InventoryRecord::new("P002", "Basil", 3)];
        let text = render(|out| low_stock_alerts(out, &flagged));
        assert_eq!(text, "ALERT: Basil (ID: P002) is low on stock: 3\n");
    }
}
