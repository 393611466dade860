//! Deterministic fallback formulas.
//!
//! Every advisory decision has a local formula that is used whenever the
//! oracle is absent or its reply fails validation. These functions are the
//! whole of that arithmetic; they never fail and never perform I/O.

/// New stock level after receiving `quantity` units.
pub fn restock_level(current_stock: i64, quantity: u32) -> i64 {
    current_stock.saturating_add(i64::from(quantity))
}

/// New stock level after selling `quantity` units. May go negative.
pub fn sale_level(current_stock: i64, quantity: u32) -> i64 {
    current_stock.saturating_sub(i64::from(quantity))
}

/// Demand over the next `days`, assuming the recent per-sale rate continues.
///
/// Averages the last `min(history.len(), days)` entries, truncates the mean,
/// and multiplies by `days`. An empty history or a zero horizon yields 0.
pub fn moving_average_forecast(sales_history: &[u32], days: u32) -> i64 {
    let window = sales_history.len().min(days as usize);
    if window == 0 {
        return 0;
    }

    let recent = &sales_history[sales_history.len() - window..];
    let sum: u64 = recent.iter().map(|&q| u64::from(q)).sum();
    let mean = sum / window as u64;

    i64::try_from(mean)
        .unwrap_or(i64::MAX)
        .saturating_mul(i64::from(days))
}

/// Units to order so that forecast demand plus safety stock is covered.
///
/// Never negative.
pub fn shortfall_reorder(current_stock: i64, forecasted_sales: i64, safety_stock: i64) -> i64 {
    forecasted_sales
        .saturating_add(safety_stock)
        .saturating_sub(current_stock)
        .max(0)
}

/// Strictly below the threshold counts as low stock.
pub fn is_below_threshold(current_stock: i64, threshold: i64) -> bool {
    current_stock < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_restock_and_sale() {
        assert_eq!(restock_level(10, 5), 15);
        assert_eq!(sale_level(10, 5), 5);
        assert_eq!(sale_level(3, 5), -2);
    }

    #[test]
    fn test_forecast_empty_history() {
        assert_eq!(moving_average_forecast(&[], 7), 0);
        assert_eq!(moving_average_forecast(&[], 0), 0);
    }

    #[test]
    fn test_forecast_zero_days() {
        assert_eq!(moving_average_forecast(&[5, 5, 5], 0), 0);
    }

    #[test]
    fn test_forecast_short_history() {
        // window = 3, mean = 6, horizon = 7
        assert_eq!(moving_average_forecast(&[4, 6, 8], 7), 42);
    }

    #[test]
    fn test_forecast_uses_most_recent_window() {
        // last two entries: mean(10, 20) = 15
        assert_eq!(moving_average_forecast(&[100, 10, 20], 2), 30);
    }

    #[test]
    fn test_forecast_truncates_mean() {
        // mean(1, 2) = 1.5 -> 1
        assert_eq!(moving_average_forecast(&[1, 2], 7), 7);
    }

    #[test]
    fn test_shortfall_reorder() {
        assert_eq!(shortfall_reorder(20, 5, 10), 0);
        assert_eq!(shortfall_reorder(2, 5, 10), 13);
        assert_eq!(shortfall_reorder(-4, 0, 10), 14);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(is_below_threshold(9, 10));
        assert!(!is_below_threshold(10, 10));
        assert!(!is_below_threshold(11, 10));
    }

    proptest! {
        #[test]
        fn prop_restock_then_sale_is_identity(stock in -10_000i64..10_000, q in 0u32..10_000) {
            prop_assert_eq!(sale_level(restock_level(stock, q), q), stock);
        }

        #[test]
        fn prop_reorder_never_negative(
            stock in -10_000i64..10_000,
            forecast in -10_000i64..10_000,
            safety in 0i64..1_000,
        ) {
            prop_assert!(shortfall_reorder(stock, forecast, safety) >= 0);
        }

        #[test]
        fn prop_forecast_bounded_by_peak(
            history in proptest::collection::vec(0u32..500, 1..30),
            days in 1u32..30,
        ) {
            let peak = i64::from(*history.iter().max().unwrap());
            let forecast = moving_average_forecast(&history, days);
            prop_assert!(forecast >= 0);
            prop_assert!(forecast <= peak * i64::from(days));
        }
    }
}
