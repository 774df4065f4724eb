use core_types::{Cadence, SubnetId, YieldModelId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section carries a `Default` implementation, so a minimal
/// `config.toml` only needs the fields it wants to override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub costs: Costs,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub price_model: PriceModel,
    #[serde(default)]
    pub yield_model: YieldModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Contains parameters shared by every simulation run.
#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    /// The initial starting capital for the basket.
    pub initial_capital: Decimal,
    /// The annual risk-free rate used in the Sharpe ratio (e.g., 0.05 for 5%).
    pub risk_free_rate: f64,
}

/// Transaction cost assumptions applied to every executed trade.
#[derive(Debug, Clone, Deserialize)]
pub struct Costs {
    /// The fee charged on executed trade notional, in basis points.
    pub transaction_cost_bps: Decimal,
    /// The assumed price slippage on executed trade notional, in basis points.
    pub slippage_bps: Decimal,
    /// Trades whose absolute value falls below this are skipped entirely.
    pub min_trade_value: Decimal,
    /// Holdings whose quantity falls below this are dropped after a rebalance.
    pub dust_threshold: Decimal,
}

impl Costs {
    /// The combined cost fraction charged on executed notional.
    pub fn total_rate(&self) -> Decimal {
        (self.transaction_cost_bps + self.slippage_bps) / dec!(10000)
    }

    /// A copy of these costs with both bps charges zeroed. The continuous
    /// benchmark trades under this, keeping the trade and dust thresholds so
    /// its path differs from a costed run only by cost.
    pub fn frictionless(&self) -> Costs {
        Costs {
            transaction_cost_bps: Decimal::ZERO,
            slippage_bps: Decimal::ZERO,
            ..self.clone()
        }
    }
}

/// Defines how the emission-weighted basket is constructed and swept.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// The number of top subnets (by emission share) included in the basket.
    pub top_n: usize,
    /// The rebalancing cadences a sweep evaluates. The continuous benchmark
    /// is always run in addition to this list.
    pub cadences: Vec<Cadence>,
}

/// Constants for the synthetic price series derived from emission changes.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceModel {
    /// Scales each per-tick emission percentage change into a price return.
    pub damping: Decimal,
    /// Clamp applied to each damped per-tick return (0.5 means +/-50%).
    /// Must stay below 1 so prices remain strictly positive.
    pub clip_pct: Decimal,
    /// The price every subnet's synthetic series starts from.
    pub base_price: Decimal,
}

/// Selects and parameterizes the staking-yield model.
#[derive(Debug, Clone, Deserialize)]
pub struct YieldModelConfig {
    /// Which yield model implementation to build.
    pub model: YieldModelId,
    /// Daily yield fraction credited per unit of emission share
    /// (used by the `emission_rate` model).
    pub emission_to_daily_rate: f64,
    /// Constant APY percentage applied to every subnet
    /// (used by the `flat_rate` model).
    pub flat_apy_pct: f64,
    /// Per-subnet circulating alpha supply (used by the `stake_ratio` model).
    /// Subnets absent from this table are treated as yielding nothing.
    #[serde(default)]
    pub supplies: Vec<SupplyEntry>,
}

/// Circulating alpha supply of a single subnet, in alpha units.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplyEntry {
    pub subnet: SubnetId,
    pub alpha_supply: f64,
}

/// Output locations for reports and logs.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where CSV reports are written.
    pub report_dir: PathBuf,
    /// Directory where rolling log files are written.
    pub logs_dir: PathBuf,
}

// --- Default Implementations ---
// These allow a user to omit any section from their toml and still have it
// work with the engine's standard assumptions.

impl Default for Simulation {
    fn default() -> Self {
        Self {
            initial_capital: dec!(1000000),
            risk_free_rate: 0.05,
        }
    }
}

impl Default for Costs {
    fn default() -> Self {
        Self {
            transaction_cost_bps: dec!(10),
            slippage_bps: dec!(5),
            min_trade_value: dec!(0.01),
            dust_threshold: dec!(0.001),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            cadences: [1, 2, 4, 8, 12, 24, 48, 72, 168]
                .into_iter()
                .map(Cadence::from_hours)
                .collect(),
        }
    }
}

impl Default for PriceModel {
    fn default() -> Self {
        Self {
            damping: dec!(0.1),
            clip_pct: dec!(0.5),
            base_price: dec!(100),
        }
    }
}

impl Default for YieldModelConfig {
    fn default() -> Self {
        Self {
            model: YieldModelId::EmissionRate,
            emission_to_daily_rate: 0.0001,
            flat_apy_pct: 50.0,
            supplies: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("reports"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Checks the cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::Validation(
                "[simulation] initial_capital must be positive".to_string(),
            ));
        }
        if self.costs.transaction_cost_bps < Decimal::ZERO
            || self.costs.slippage_bps < Decimal::ZERO
        {
            return Err(ConfigError::Validation(
                "[costs] fee and slippage bps cannot be negative".to_string(),
            ));
        }
        if self.costs.min_trade_value < Decimal::ZERO || self.costs.dust_threshold < Decimal::ZERO
        {
            return Err(ConfigError::Validation(
                "[costs] trade and dust thresholds cannot be negative".to_string(),
            ));
        }
        if self.index.top_n == 0 {
            return Err(ConfigError::Validation(
                "[index] top_n must be at least 1".to_string(),
            ));
        }
        if self.index.cadences.is_empty() {
            return Err(ConfigError::Validation(
                "[index] cadences cannot be empty".to_string(),
            ));
        }
        if self.price_model.damping <= Decimal::ZERO {
            return Err(ConfigError::Validation(
                "[price_model] damping must be positive".to_string(),
            ));
        }
        if self.price_model.clip_pct <= Decimal::ZERO || self.price_model.clip_pct >= Decimal::ONE
        {
            return Err(ConfigError::Validation(
                "[price_model] clip_pct must lie in (0, 1) so prices stay positive".to_string(),
            ));
        }
        if self.price_model.base_price <= Decimal::ZERO {
            return Err(ConfigError::Validation(
                "[price_model] base_price must be positive".to_string(),
            ));
        }
        if self.yield_model.emission_to_daily_rate < 0.0 || self.yield_model.flat_apy_pct < 0.0 {
            return Err(ConfigError::Validation(
                "[yield_model] rates cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.index.top_n, 20);
        assert_eq!(config.costs.total_rate(), dec!(0.0015));
    }

    #[test]
    fn test_frictionless_zeroes_only_the_bps_charges() {
        let costs = Costs::default().frictionless();
        assert_eq!(costs.total_rate(), Decimal::ZERO);
        assert_eq!(costs.min_trade_value, dec!(0.01));
        assert_eq!(costs.dust_threshold, dec!(0.001));
    }

    #[test]
    fn test_rejects_zero_top_n() {
        let mut config = Config::default();
        config.index.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_full_clip_range() {
        let mut config = Config::default();
        config.price_model.clip_pct = dec!(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_partial_toml_with_defaults() {
        let raw = r#"
            [index]
            top_n = 5
            cadences = ["1h", "1d", "continuous"]

            [yield_model]
            model = "stake_ratio"
            emission_to_daily_rate = 0.0001
            flat_apy_pct = 50.0

            [[yield_model.supplies]]
            subnet = 64
            alpha_supply = 1129000.0
        "#;
        let parsed = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap();

        assert_eq!(parsed.index.top_n, 5);
        assert_eq!(parsed.index.cadences[1], Cadence::from_hours(24));
        assert!(parsed.index.cadences[2].is_continuous());
        assert_eq!(parsed.yield_model.model, YieldModelId::StakeRatio);
        assert_eq!(parsed.yield_model.supplies[0].subnet, 64);
        // Omitted sections fall back to the standard assumptions.
        assert_eq!(parsed.simulation.initial_capital, dec!(1000000));
        assert_eq!(parsed.costs.slippage_bps, dec!(5));
    }
}
