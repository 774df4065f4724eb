use thiserror::Error;

#[derive(Error, Debug)]
pub enum YieldModelError {
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),
}
