use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: got {0} NAV point(s), need at least 2")]
    InsufficientHistory(usize),
}
