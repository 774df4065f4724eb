use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("No continuous benchmark run present in the sweep results")]
    MissingBenchmark,
}
