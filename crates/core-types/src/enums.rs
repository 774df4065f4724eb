use serde::{Deserialize, Serialize};

/// Identifies which staking-yield model the simulator should be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldModelId {
    /// APY proportional to the subnet's emission fraction.
    EmissionRate,
    /// Power-law staking-participation model calibrated on observed subnets.
    StakeRatio,
    /// The same constant APY for every subnet.
    FlatRate,
}
