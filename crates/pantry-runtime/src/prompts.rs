//! Decision request wording.
//!
//! Each agent gets a short system prompt setting its role and a user prompt
//! carrying only the data and the question. Replies are capped at a handful of tokens, so every
//! prompt ends by asking for a bare integer or a yes/no.

use pantry_core::InventoryRecord;

use crate::oracle::{AgentKind, DecisionRequest};

/// System prompt for restock and sale reconciliation.
pub const STOCK_UPDATE_SYSTEM_PROMPT: &str = "You are a helpful inventory management assistant.";

/// System prompt for demand forecasting.
pub const FORECAST_SYSTEM_PROMPT: &str = "You are a helpful sales forecasting agent.";

/// System prompt for reorder suggestions.
pub const REORDER_SYSTEM_PROMPT: &str = "You are a helpful reorder agent.";

/// System prompt for low-stock classification.
pub const LOW_STOCK_SYSTEM_PROMPT: &str = "You are a helpful stock level monitor agent.";

const INTEGER_ONLY: &str = "Just return the integer value.";

/// Ask for the stock level after receiving `quantity` units.
pub fn restock_request(record: &InventoryRecord, quantity: u32) -> DecisionRequest {
    DecisionRequest {
        agent: AgentKind::StockUpdate,
        system: STOCK_UPDATE_SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "The current stock for {} (ID: {}) is {}. \
             The user wants to restock {} units. What should the new stock be? {}",
            record.product_name, record.product_id, record.current_stock, quantity, INTEGER_ONLY
        ),
    }
}

/// Ask for the stock level after selling `quantity` units.
pub fn sale_request(record: &InventoryRecord, quantity: u32) -> DecisionRequest {
    DecisionRequest {
        agent: AgentKind::StockUpdate,
        system: STOCK_UPDATE_SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "The current stock for {} (ID: {}) is {}. \
             The user reports a sale of {} units. What should the new stock be? {}",
            record.product_name, record.product_id, record.current_stock, quantity, INTEGER_ONLY
        ),
    }
}

/// Ask for total demand over the next `days`.
pub fn forecast_request(sales_history: &[u32], days: u32) -> DecisionRequest {
    DecisionRequest {
        agent: AgentKind::Forecast,
        system: FORECAST_SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "Given the following sales history for a product: {:?}, \
             predict the total sales for the next {} days. {}",
            sales_history, days, INTEGER_ONLY
        ),
    }
}

/// Ask how many units to reorder.
pub fn reorder_request(current_stock: i64, forecasted_sales: i64, safety_stock: i64) -> DecisionRequest {
    DecisionRequest {
        agent: AgentKind::Reorder,
        system: REORDER_SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "Current stock: {}. Forecasted sales for next period: {}. \
             Safety stock threshold: {}. How many units should be reordered? {}",
            current_stock, forecasted_sales, safety_stock, INTEGER_ONLY
        ),
    }
}

/// Ask whether a product is low on stock.
pub fn low_stock_request(record: &InventoryRecord, threshold: i64) -> DecisionRequest {
    DecisionRequest {
        agent: AgentKind::LowStock,
        system: LOW_STOCK_SYSTEM_PROMPT.to_string(),
        prompt: format!(
            "The current stock for {} (ID: {}) is {}. The low stock threshold is {}. \
             Is this product low on stock? Reply with 'yes' or 'no'.",
            record.product_name, record.product_id, record.current_stock, threshold
        ),
    }
}
