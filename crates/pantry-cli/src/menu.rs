//! Interactive menu loop.

use std::io::{self, BufRead, Write};

use pantry_core::RecordStore;
use pantry_runtime::{InventoryService, RuntimeConfig};

use crate::render;

/// Tunables the menu passes to each operation.
#[derive(Debug, Clone, Copy)]
pub struct MenuSettings {
    pub forecast_days: u32,
    pub safety_stock: i64,
    pub low_stock_threshold: i64,
}

impl From<&RuntimeConfig> for MenuSettings {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            forecast_days: config.forecast_days,
            safety_stock: config.safety_stock(),
            low_stock_threshold: config.low_stock_threshold,
        }
    }
}

const MENU: &str = "\nAI Inventory Management System\n\
                    1. View Inventory\n\
                    2. Record Sale\n\
                    3. Restock Product\n\
                    4. Forecast Sales & Reorder Suggestions\n\
                    5. Check Low Stock Alerts\n\
                    0. Exit";

/// Run the menu until the user exits or input ends.
///
/// Operation failures are reported and the loop continues; only I/O errors
/// on `input`/`out` end it early.
pub fn run<S, R, W>(
    service: &InventoryService<S>,
    settings: MenuSettings,
    mut input: R,
    mut out: W,
) -> io::Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "{}", MENU)?;
        let Some(choice) = prompt(&mut input, &mut out, "Select an option: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => match service.list() {
                Ok(records) => render::inventory(&mut out, &records)?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "2" | "3" => {
                let selling = choice == "2";
                let Some(product_id) = prompt(&mut input, &mut out, "Enter product_id: ")? else {
                    break;
                };
                let label = if selling {
                    "Enter quantity sold: "
                } else {
                    "Enter quantity to restock: "
                };
                let Some(raw_quantity) = prompt(&mut input, &mut out, label)? else {
                    break;
                };
                let Ok(quantity) = raw_quantity.parse::<u32>() else {
                    writeln!(out, "Invalid quantity: '{}'.", raw_quantity)?;
                    continue;
                };

                let result = if selling {
                    service.record_sale(&product_id, quantity)
                } else {
                    service.restock(&product_id, quantity)
                };
                match result {
                    Ok(_) if selling => writeln!(out, "Sale recorded.")?,
                    Ok(_) => writeln!(out, "Product restocked.")?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            "4" => match service.reorder_report(settings.forecast_days, settings.safety_stock) {
                Ok(lines) => render::reorder_report(&mut out, &lines, settings.forecast_days)?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "5" => match service.low_stock_alerts(settings.low_stock_threshold) {
                Ok(flagged) => render::low_stock_alerts(&mut out, &flagged)?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "0" => {
                writeln!(out, "Exiting.")?;
                break;
            }
            _ => writeln!(out, "Invalid option. Try again.")?,
        }
    }

    out.flush()
}

/// Print `label` and read one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
