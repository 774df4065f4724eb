pub mod cadence;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use cadence::Cadence;
pub use enums::YieldModelId;
pub use error::CoreError;
pub use structs::{EmissionSnapshot, NavPoint, SubnetId};

/// Hourly tick granularity: snapshots are one hour apart by construction,
/// so this is both the compounding period count and the annualization base.
pub const HOURS_PER_YEAR: u32 = 24 * 365;
