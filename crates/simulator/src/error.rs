use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
