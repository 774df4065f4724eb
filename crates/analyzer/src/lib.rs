//! # Alphabasket Comparison Analyzer
//!
//! This crate turns the raw per-cadence sweep results into a ranked,
//! benchmark-relative comparison. It is the last pure-logic stage before
//! rendering: everything it produces is plain data for the CLI or CSV export.
//!
//! ## Architectural Principles
//!
//! - **Benchmark-Relative:** Every cadence is measured against the
//!   frictionless continuous run, which is the only history tracking error
//!   can meaningfully be computed against. A sweep without that benchmark
//!   cannot be analyzed.
//! - **Ranking Is Presentation-Free:** Rows are ordered by total return and a
//!   recommendation is derived from Sharpe, but nothing here formats tables
//!   or writes files.
//!
//! ## Public API
//!
//! - `ComparisonAnalyzer`: Builds the comparison from sweep results.
//! - `ComparisonReport` / `ComparisonRow`: The ranked output.
//! - `AnalyzerError`: The specific error types that can be returned from this crate.

use analytics::AnalyticsEngine;
use core_types::Cadence;
use rust_decimal::Decimal;
use serde::Serialize;
use simulator::SimulationResult;
use std::cmp::Ordering;
use tracing::debug;

pub mod error;

pub use error::AnalyzerError;

/// One cadence's line in the comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub cadence: Cadence,
    pub final_nav: Decimal,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub annualized_volatility_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub rebalance_count: u32,
    pub total_transaction_cost: Decimal,
    pub transaction_cost_pct: f64,
    /// Annualized tracking error against the continuous benchmark, as a
    /// fraction. Exactly zero for the benchmark itself.
    pub tracking_error: f64,
    pub simulated_days: i64,
}

/// The full ranked comparison across every swept cadence.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Rows sorted by total return, best first.
    pub rows: Vec<ComparisonRow>,
    /// The cadence with the best Sharpe ratio, excluding the benchmark.
    /// `None` when the sweep produced nothing but the benchmark.
    pub recommended: Option<Cadence>,
}

/// The main comparison engine.
pub struct ComparisonAnalyzer {
    engine: AnalyticsEngine,
}

impl ComparisonAnalyzer {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            engine: AnalyticsEngine::new(risk_free_rate),
        }
    }

    /// Scores every result against the continuous benchmark and ranks them.
    pub fn analyze(
        &self,
        results: &[SimulationResult],
    ) -> Result<ComparisonReport, AnalyzerError> {
        // 1. Locate the benchmark; without it the comparison is meaningless.
        let benchmark = results
            .iter()
            .find(|result| result.cadence.is_continuous())
            .ok_or(AnalyzerError::MissingBenchmark)?;

        // 2. Build one row per result, with tracking error measured against
        //    the benchmark's NAV path.
        let mut rows: Vec<ComparisonRow> = results
            .iter()
            .map(|result| {
                let tracking_error = if result.cadence.is_continuous() {
                    0.0
                } else {
                    self.engine
                        .tracking_error(&result.nav_history, &benchmark.nav_history)
                };
                build_row(result, tracking_error)
            })
            .collect();

        // 3. Rank by total return, best first.
        rows.sort_by(|a, b| {
            b.total_return_pct
                .partial_cmp(&a.total_return_pct)
                .unwrap_or(Ordering::Equal)
        });

        // 4. Recommend the best risk-adjusted cadence, never the benchmark.
        let recommended = rows
            .iter()
            .filter(|row| !row.cadence.is_continuous())
            .max_by(|a, b| {
                a.sharpe_ratio
                    .partial_cmp(&b.sharpe_ratio)
                    .unwrap_or(Ordering::Equal)
            })
            .map(|row| row.cadence);

        debug!("Ranked {} cadences; recommended: {:?}", rows.len(), recommended);

        Ok(ComparisonReport { rows, recommended })
    }
}

fn build_row(result: &SimulationResult, tracking_error: f64) -> ComparisonRow {
    ComparisonRow {
        cadence: result.cadence,
        final_nav: result.final_nav,
        total_return_pct: result.report.total_return_pct,
        annualized_return_pct: result.report.annualized_return_pct,
        annualized_volatility_pct: result.report.annualized_volatility_pct,
        sharpe_ratio: result.report.sharpe_ratio,
        max_drawdown_pct: result.report.max_drawdown_pct,
        rebalance_count: result.rebalance_count,
        total_transaction_cost: result.total_transaction_cost,
        transaction_cost_pct: result.transaction_cost_pct,
        tracking_error,
        simulated_days: result.report.simulated_days,
    }
}
