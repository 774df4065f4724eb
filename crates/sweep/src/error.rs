use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("The frictionless benchmark run failed: {0}")]
    Benchmark(#[from] simulator::SimulatorError),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}
