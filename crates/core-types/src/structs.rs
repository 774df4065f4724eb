use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Network-level subnet identifier (netuid).
pub type SubnetId = u16;

/// One hourly observation of the network's emission split.
///
/// `emissions` maps each subnet to its fraction of total network emissions in
/// that hour. Fractions need not sum to exactly 1; subnets with zero emission
/// are simply absent. Snapshots are immutable once loaded and are kept in
/// strict timestamp order by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionSnapshot {
    pub timestamp: DateTime<Utc>,
    pub block: u64,
    pub emissions: HashMap<SubnetId, Decimal>,
}

impl EmissionSnapshot {
    /// Emission fraction for a single subnet, zero when absent.
    pub fn emission(&self, subnet: SubnetId) -> Decimal {
        self.emissions.get(&subnet).copied().unwrap_or(Decimal::ZERO)
    }
}

/// One point of a simulation's NAV history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub timestamp: DateTime<Utc>,
    pub nav: Decimal,
    pub cash: Decimal,
}
