//! `pantry`: restaurant inventory with LLM-advised decisions.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pantry_core::CsvRecordStore;
use pantry_runtime::{oracle_from_config, InventoryService, RuntimeConfig};

mod menu;
mod render;

use menu::MenuSettings;

/// Config file picked up from the working directory when --config is absent.
const DEFAULT_CONFIG_FILE: &str = "pantry.yaml";

#[derive(Parser, Debug)]
#[command(name = "pantry", version, about = "Track stock, forecast demand and suggest reorders")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Inventory CSV file (overrides config)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Never consult the oracle; use fallback formulas only
    #[arg(long, global = true)]
    offline: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu,

    /// List every product
    List,

    /// Record a sale
    Sale { product_id: String, quantity: u32 },

    /// Restock a product
    Restock { product_id: String, quantity: u32 },

    /// Forecast demand and suggest reorders for every product
    Forecast {
        /// Forecast horizon in days
        #[arg(long)]
        days: Option<u32>,

        /// Safety stock to keep on hand
        #[arg(long)]
        safety_stock: Option<i64>,
    },

    /// List products that are low on stock
    Alerts {
        /// Stock strictly below this is low
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(?config, "Configuration loaded");

    let oracle = oracle_from_config(&config).context("Failed to start oracle runtime")?;
    let service = InventoryService::new(CsvRecordStore::new(&config.inventory_file), oracle);
    let settings = MenuSettings::from(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            menu::run(&service, settings, stdin.lock(), &mut out)?;
        }
        Command::List => {
            let records = service.list()?;
            render::inventory(&mut out, &records)?;
        }
        Command::Sale {
            product_id,
            quantity,
        } => {
            let change = service.record_sale(&product_id, quantity)?;
            render::stock_change(&mut out, "Sold", &change)?;
        }
        Command::Restock {
            product_id,
            quantity,
        } => {
            let change = service.restock(&product_id, quantity)?;
            render::stock_change(&mut out, "Restocked", &change)?;
        }
        Command::Forecast { days, safety_stock } => {
            let days = days.unwrap_or(settings.forecast_days);
            let safety_stock = safety_stock.unwrap_or(settings.safety_stock);
            let lines = service.reorder_report(days, safety_stock)?;
            render::reorder_report(&mut out, &lines, days)?;
        }
        Command::Alerts { threshold } => {
            let flagged = service.low_stock_alerts(threshold.unwrap_or(settings.low_stock_threshold))?;
            render::low_stock_alerts(&mut out, &flagged)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Logs go to stderr so they never interleave with menu output on stdout.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            RuntimeConfig::from_yaml_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?
        }
        None => RuntimeConfig::default(),
    };

    if let Some(file) = &cli.file {
        config.inventory_file = file.clone();
    }
    if cli.offline {
        config.oracle.enabled = false;
    }

    Ok(config)
}
