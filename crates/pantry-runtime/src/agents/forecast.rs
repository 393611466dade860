//! Demand forecasting from sales history.

use std::sync::Arc;

use pantry_core::fallback;

use crate::advisory::{consult, parse_integer, Decision};
use crate::oracle::AdvisoryOracle;
use crate::prompts;

/// Predicts total demand over a horizon.
///
/// Falls back to a moving average over the most recent `days` sales.
#[derive(Clone)]
pub struct ForecastEngine {
    oracle: Arc<dyn AdvisoryOracle>,
}

impl ForecastEngine {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self { oracle }
    }

    /// Forecast demand over the next `days`.
    pub fn forecast(&self, sales_history: &[u32], days: u32) -> Decision<i64> {
        let request = prompts::forecast_request(sales_history, days);
        let decision = consult(self.oracle.as_ref(), &request, parse_integer, || {
            fallback::moving_average_forecast(sales_history, days)
        });

        tracing::debug!(days, forecast = decision.value, source = %decision.source, "Forecast computed");
        decision
    }
}
