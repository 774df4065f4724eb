use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Schedule file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse weight schedule {0}: {1}")]
    Parse(String, String),

    #[error("Schedule effective dates are not strictly increasing at entry {0}")]
    UnorderedSchedule(usize),
}
