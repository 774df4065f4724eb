use core_types::SubnetId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Snapshot directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot file {0}: {1}")]
    Parse(String, String),

    #[error("No usable snapshots were loaded from {0}")]
    Empty(String),

    #[error("Need at least 2 snapshots to simulate, got {0}")]
    InsufficientSnapshots(usize),

    #[error("Snapshot timestamps are not strictly increasing at index {0}")]
    OutOfOrder(usize),

    #[error("Price series for subnet {0} has {1} entries, expected {2}")]
    MisalignedPrices(SubnetId, usize, usize),
}
