use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A standardized summary of one simulated NAV history.
///
/// This struct is the final output of the `AnalyticsEngine` and serves as the
/// data transfer object for performance results throughout the entire system.
/// Return and risk figures are expressed in percent so they can be rendered
/// directly; `max_drawdown_pct` is zero or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Return Metrics
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,

    // II. Risk Metrics
    pub annualized_volatility_pct: f64,
    /// Zero whenever the history is too flat to carry a volatility signal.
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough decline observed, as a non-positive percentage.
    pub max_drawdown_pct: f64,

    // III. Time-Based Metrics
    /// Whole days covered by the history; the annualization basis.
    pub simulated_days: i64,
    /// Exact span between the first and last NAV point.
    #[serde(with = "humantime_serde")]
    pub simulated_span: Duration,
}
