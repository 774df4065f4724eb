//! # Basket Portfolio
//!
//! This crate owns the only mutable state in a simulation run: cash and
//! per-subnet holdings. It computes emission-weighted target allocations and
//! executes cost-aware rebalances against an arbitrary price vector.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   snapshots, cadences, or yield. It depends only on `core-types` and
//!   `configuration`.
//! - **Total Operations:** Valuation and rebalancing never fail. Missing
//!   prices contribute zero value and stale-price trades are skipped with a
//!   log line, because one bad quote must not abort a simulation.
//!
//! ## Public API
//!
//! - `Portfolio`: Cash, holdings, and the rebalance state transition.
//! - `calculate_target_weights`: Emission-proportional top-N allocation.
//! - `WeightSchedule`: A dated table of externally supplied allocations.

pub mod error;
pub mod schedule;
pub mod state;
pub mod weights;

// Re-export the key components to create a clean, public-facing API.
pub use error::PortfolioError;
pub use schedule::{ScheduleEntry, WeightSchedule};
pub use state::Portfolio;
pub use weights::calculate_target_weights;
