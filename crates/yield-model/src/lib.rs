//! # Staking Yield Models
//!
//! This crate estimates the annualized staking yield a subnet pays its
//! holders. It defines a universal `YieldModel` trait and provides several
//! concrete implementations.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   snapshots, portfolios, or simulation. It depends only on `core-types`
//!   and `configuration`.
//! - **Model Agnostic Engine:** By using the `YieldModel` trait, the
//!   simulator can compound staking rewards without knowing which calibration
//!   produced the rate. Swapping calibrations never touches simulation code.
//! - **Extensibility:** Adding a new model involves creating a new module,
//!   implementing the `YieldModel` trait, and adding it to the
//!   `YieldModelId` enum and `factory`.
//!
//! ## Public API
//!
//! - `YieldModel`: The core trait all models implement.
//! - `create_model`: The factory function to construct a model instance.
//! - The concrete model structs themselves (e.g., `EmissionRateModel`).

// Declare all the modules that constitute this crate.
pub mod emission_rate;
pub mod error;
pub mod factory;
pub mod flat_rate;
pub mod stake_ratio;

// Re-export the key components to create a clean, public-facing API.
pub use emission_rate::EmissionRateModel;
pub use error::YieldModelError;
pub use factory::create_model;
pub use flat_rate::FlatRateModel;
pub use stake_ratio::StakeRatioModel;

use core_types::SubnetId;
use rust_decimal::Decimal;

/// The core trait that all staking-yield models must implement.
///
/// Implementations are pure functions of their own calibration data. A model
/// that needs per-subnet context beyond the emission fraction (circulating
/// supply, for instance) owns that table itself, which keeps the simulator
/// supply-agnostic.
///
/// The `Send + Sync` bounds are required to allow one model instance to be
/// shared across the parallel cadence sweep.
pub trait YieldModel: Send + Sync {
    /// Returns the annualized staking yield for `subnet`, in percent
    /// (70.0 means 70% APY), given its current emission fraction.
    ///
    /// Unknown subnets and degenerate inputs yield 0 rather than an error;
    /// a missing yield is a data-quality condition, not a failure.
    fn estimate_apy(&self, subnet: SubnetId, emission_fraction: Decimal) -> f64;
}
