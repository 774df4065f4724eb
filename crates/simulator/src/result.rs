use analytics::PerformanceReport;
use core_types::{Cadence, NavPoint};
use rust_decimal::Decimal;
use serde::Serialize;

/// The complete outcome of simulating one rebalance cadence end to end.
///
/// Carries both the raw NAV history, which downstream consumers need for
/// tracking-error math and CSV export, and the derived performance report.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub cadence: Cadence,
    pub nav_history: Vec<NavPoint>,
    pub final_nav: Decimal,
    pub report: PerformanceReport,
    /// Number of ticks on which the basket actually traded toward a target.
    pub rebalance_count: u32,
    pub total_transaction_cost: Decimal,
    /// Cumulative transaction cost as a percentage of initial capital.
    pub transaction_cost_pct: f64,
}
