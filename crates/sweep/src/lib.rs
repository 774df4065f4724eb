//! # Alphabasket Cadence Sweep
//!
//! This crate fans one snapshot table out across every configured rebalance
//! cadence and collects the per-cadence results for comparison. Each cadence
//! is an independent simulation over shared read-only data, so the sweep runs
//! them data-parallel on all available cores.
//!
//! ## Architectural Principles
//!
//! - **The Benchmark Is Always Present:** The continuous cadence is added to
//!   the sweep whether or not the configuration lists it, and it alone runs
//!   with transaction costs zeroed out. Every other cadence is measured
//!   against that frictionless path.
//! - **One Bad Cadence Does Not Sink the Sweep:** A failed cadence run is
//!   logged and excluded from the comparison. Only a benchmark failure aborts
//!   the sweep, because without it the comparison is meaningless.
//!
//! ## Public API
//!
//! - `SweepRunner`: Configures and executes the parallel sweep.
//! - `SweepError`: The specific error types that can be returned from this crate.

use configuration::Config;
use core_types::Cadence;
use emissions::SnapshotTable;
use indicatif::{ProgressBar, ProgressStyle};
use portfolio::WeightSchedule;
use simulator::{CadenceSimulator, SimulationResult, SimulatorError};
use std::collections::BTreeSet;
use std::sync::mpsc;
use tracing::{error, info};
use yield_model::YieldModel;

pub mod error;

pub use error::SweepError;

/// Runs every configured cadence over one snapshot table in parallel.
pub struct SweepRunner<'a> {
    config: &'a Config,
    yield_model: &'a dyn YieldModel,
    schedule: Option<&'a WeightSchedule>,
}

impl<'a> SweepRunner<'a> {
    pub fn new(config: &'a Config, yield_model: &'a dyn YieldModel) -> Self {
        Self {
            config,
            yield_model,
            schedule: None,
        }
    }

    /// Drives every simulated cadence from a precomputed weight schedule
    /// instead of top-N emission weighting.
    pub fn with_weight_schedule(mut self, schedule: &'a WeightSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Simulates all cadences and returns their results, noncontinuous first
    /// in ascending cadence order, the benchmark last.
    pub fn run(&self, table: &SnapshotTable) -> Result<Vec<SimulationResult>, SweepError> {
        let cadences = self.sweep_cadences();
        info!(
            "Sweeping {} cadences over {} snapshot ticks on {} CPU cores",
            cadences.len(),
            table.len(),
            rayon::current_num_threads()
        );

        let progress_bar = ProgressBar::new(cadences.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .map_err(|e| SweepError::ProgressBarTemplate(e.to_string()))?
                .progress_chars("=>-"),
        );

        let (sender, receiver) = mpsc::channel();
        rayon::scope(|s| {
            for cadence in &cadences {
                let sender = sender.clone();
                let progress_bar = progress_bar.clone();
                s.spawn(move |_| {
                    let outcome = self.run_single(table, *cadence);
                    let _ = sender.send((*cadence, outcome));
                    progress_bar.inc(1);
                });
            }
        });
        drop(sender);
        progress_bar.finish_with_message("Cadence sweep complete.");

        let mut results = Vec::with_capacity(cadences.len());
        let mut benchmark_error: Option<SimulatorError> = None;
        for (cadence, outcome) in receiver.iter() {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) if cadence.is_continuous() => benchmark_error = Some(e),
                Err(e) => {
                    error!(
                        "Cadence {} failed and is excluded from the comparison: {}",
                        cadence, e
                    );
                }
            }
        }
        if let Some(e) = benchmark_error {
            return Err(SweepError::Benchmark(e));
        }

        results.sort_by_key(|result| (result.cadence.is_continuous(), result.cadence.hours()));
        Ok(results)
    }

    /// The configured cadences, deduplicated, with the benchmark guaranteed in.
    fn sweep_cadences(&self) -> Vec<Cadence> {
        let mut cadences: BTreeSet<Cadence> = self.config.index.cadences.iter().copied().collect();
        cadences.insert(Cadence::CONTINUOUS);
        cadences.into_iter().collect()
    }

    fn run_single(
        &self,
        table: &SnapshotTable,
        cadence: Cadence,
    ) -> Result<SimulationResult, SimulatorError> {
        let mut simulation = CadenceSimulator::new(self.config, self.yield_model);
        if cadence.is_continuous() {
            simulation = simulation.with_costs(self.config.costs.frictionless());
        }
        if let Some(schedule) = self.schedule {
            simulation = simulation.with_weight_schedule(schedule);
        }
        simulation.run(table, cadence)
    }
}
