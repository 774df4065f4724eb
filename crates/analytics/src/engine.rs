use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use core_types::{NavPoint, HOURS_PER_YEAR};
use rust_decimal::prelude::*;
use std::time::Duration;
use tracing::debug;

/// A stateless calculator for deriving performance metrics from a NAV history.
///
/// One engine instance is shared across every cadence run so that all reports
/// are scored against the same risk-free rate and annualization basis.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    /// Annual risk-free rate as a fraction, e.g. `0.05` for 5%.
    risk_free_rate: f64,
    /// Observations per year used to annualize tick-level statistics.
    periods_per_year: f64,
}

impl AnalyticsEngine {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            periods_per_year: f64::from(HOURS_PER_YEAR),
        }
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `nav_history` - The chronological NAV series recorded by a simulation run.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport` or an `AnalyticsError` when
    /// the history holds fewer than two points.
    pub fn calculate(&self, nav_history: &[NavPoint]) -> Result<PerformanceReport, AnalyticsError> {
        if nav_history.len() < 2 {
            return Err(AnalyticsError::InsufficientHistory(nav_history.len()));
        }

        let navs = nav_values(nav_history);

        // --- 1. Total and annualized return ---
        let initial = navs[0];
        let final_nav = navs[navs.len() - 1];
        let total_return = if initial > 0.0 {
            final_nav / initial - 1.0
        } else {
            0.0
        };

        let span = nav_history[nav_history.len() - 1].timestamp - nav_history[0].timestamp;
        let simulated_days = span.num_days();
        let annualized_return = if simulated_days > 0 {
            (1.0 + total_return).powf(365.0 / simulated_days as f64) - 1.0
        } else {
            0.0
        };

        // --- 2. Volatility of tick-level returns ---
        let returns = pct_change(&navs);
        let volatility = sample_std(&returns) * self.periods_per_year.sqrt();

        // --- 3. Risk-adjusted metrics ---
        let sharpe_ratio = if volatility > 0.0 {
            (annualized_return - self.risk_free_rate) / volatility
        } else {
            0.0
        };
        let max_drawdown = max_drawdown(&navs);

        debug!(
            "Scored {} NAV points spanning {} day(s)",
            nav_history.len(),
            simulated_days
        );

        Ok(PerformanceReport {
            total_return_pct: total_return * 100.0,
            annualized_return_pct: annualized_return * 100.0,
            annualized_volatility_pct: volatility * 100.0,
            sharpe_ratio,
            max_drawdown_pct: max_drawdown * 100.0,
            simulated_days,
            simulated_span: span.to_std().unwrap_or(Duration::ZERO),
        })
    }

    /// Annualized standard deviation of the per-tick return differences between
    /// two NAV histories, truncated to their overlapping prefix.
    ///
    /// Returns `0.0` when the overlap is too short to produce a return series.
    pub fn tracking_error(&self, nav_history: &[NavPoint], benchmark: &[NavPoint]) -> f64 {
        let overlap = nav_history.len().min(benchmark.len());
        if overlap < 2 {
            return 0.0;
        }

        let own = pct_change(&nav_values(&nav_history[..overlap]));
        let bench = pct_change(&nav_values(&benchmark[..overlap]));
        let differences: Vec<f64> = own.iter().zip(bench.iter()).map(|(a, b)| a - b).collect();

        sample_std(&differences) * self.periods_per_year.sqrt()
    }
}

fn nav_values(points: &[NavPoint]) -> Vec<f64> {
    points
        .iter()
        .map(|point| point.nav.to_f64().unwrap_or(0.0))
        .collect()
}

/// Fractional change between consecutive values; zero where the prior value is zero.
fn pct_change(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| {
            if pair[0] != 0.0 {
                pair[1] / pair[0] - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Sample standard deviation (ddof = 1); zero for fewer than two observations.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Worst peak-to-trough decline as a non-positive fraction of the running peak.
fn max_drawdown(navs: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &nav in navs {
        if nav > peak {
            peak = nav;
        }
        if peak > 0.0 {
            worst = worst.min((nav - peak) / peak);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn nav_point(hours: i64, nav: Decimal) -> NavPoint {
        NavPoint {
            timestamp: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
                + ChronoDuration::hours(hours),
            nav,
            cash: Decimal::ZERO,
        }
    }

    #[test]
    fn two_point_gain_reports_total_return_without_annualizing() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![nav_point(0, dec!(1000000)), nav_point(1, dec!(1020000))];

        let report = engine.calculate(&history).unwrap();

        assert!((report.total_return_pct - 2.0).abs() < 1e-9);
        assert_eq!(report.simulated_days, 0);
        assert_eq!(report.annualized_return_pct, 0.0);
        // A single return observation carries no volatility signal.
        assert_eq!(report.annualized_volatility_pct, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.max_drawdown_pct, 0.0);
        assert_eq!(report.simulated_span, Duration::from_secs(3600));
    }

    #[test]
    fn annualized_return_compounds_over_whole_days() {
        let engine = AnalyticsEngine::new(0.0);
        // 73 days makes 365 / days come out to exactly 5 compounding periods.
        let history = vec![nav_point(0, dec!(100)), nav_point(73 * 24, dec!(110))];

        let report = engine.calculate(&history).unwrap();

        assert_eq!(report.simulated_days, 73);
        let expected = (1.1f64.powi(5) - 1.0) * 100.0;
        assert!((report.annualized_return_pct - expected).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_tracks_the_running_peak() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![
            nav_point(0, dec!(100)),
            nav_point(1, dec!(120)),
            nav_point(2, dec!(90)),
            nav_point(3, dec!(100)),
        ];

        let report = engine.calculate(&history).unwrap();

        assert!((report.max_drawdown_pct - (-25.0)).abs() < 1e-9);
        assert!(report.max_drawdown_pct <= 0.0);
        assert!((report.total_return_pct - 0.0).abs() < 1e-9);
    }

    #[test]
    fn flat_history_scores_zero_volatility_and_zero_sharpe() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![
            nav_point(0, dec!(100)),
            nav_point(1, dec!(100)),
            nav_point(2, dec!(100)),
        ];

        let report = engine.calculate(&history).unwrap();

        assert_eq!(report.annualized_volatility_pct, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.max_drawdown_pct, 0.0);
    }

    #[test]
    fn sharpe_is_consistent_with_reported_return_and_volatility() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![
            nav_point(0, dec!(100)),
            nav_point(24, dec!(110)),
            nav_point(48, dec!(99)),
            nav_point(72, dec!(108.9)),
        ];

        let report = engine.calculate(&history).unwrap();

        assert!(report.annualized_volatility_pct > 0.0);
        let expected_sharpe = (report.annualized_return_pct / 100.0 - 0.05)
            / (report.annualized_volatility_pct / 100.0);
        assert!((report.sharpe_ratio - expected_sharpe).abs() < 1e-9);
    }

    #[test]
    fn tracking_error_is_zero_against_an_identical_history() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![
            nav_point(0, dec!(100)),
            nav_point(1, dec!(110)),
            nav_point(2, dec!(99)),
        ];

        assert_eq!(engine.tracking_error(&history, &history), 0.0);
    }

    #[test]
    fn tracking_error_truncates_to_the_overlapping_prefix() {
        let engine = AnalyticsEngine::new(0.05);
        let long = vec![
            nav_point(0, dec!(100)),
            nav_point(1, dec!(110)),
            nav_point(2, dec!(99)),
            nav_point(3, dec!(130)),
        ];
        let short = vec![
            nav_point(0, dec!(100)),
            nav_point(1, dec!(105)),
            nav_point(2, dec!(103)),
        ];

        let full = engine.tracking_error(&long, &short);
        let truncated = engine.tracking_error(&long[..3], &short);

        assert!(full > 0.0);
        assert!((full - truncated).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_points_is_an_error() {
        let engine = AnalyticsEngine::new(0.05);
        let history = vec![nav_point(0, dec!(100))];

        let result = engine.calculate(&history);

        assert!(matches!(
            result,
            Err(AnalyticsError::InsufficientHistory(1))
        ));
    }
}
