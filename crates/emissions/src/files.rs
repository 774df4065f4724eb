use crate::error::LoaderError;
use chrono::{DateTime, Utc};
use core_types::{EmissionSnapshot, SubnetId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// The on-disk shape of one collector file: a batch of hourly samples.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    samples: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    block_timestamp_utc: DateTime<Utc>,
    closest_block: u64,
    emissions: HashMap<SubnetId, Decimal>,
}

impl From<RawSample> for EmissionSnapshot {
    fn from(sample: RawSample) -> Self {
        EmissionSnapshot {
            timestamp: sample.block_timestamp_utc,
            block: sample.closest_block,
            emissions: sample.emissions,
        }
    }
}

/// Loads every collector file in `dir` and returns the merged, chronologically
/// sorted snapshot sequence.
///
/// Unreadable or malformed files are skipped with a logged error so one bad
/// download cannot poison the whole directory. Duplicate timestamps across
/// files are dropped with a warning, keeping the first occurrence in file
/// order. An empty result after all of that is fatal to the caller.
pub fn load_snapshot_dir(dir: &Path) -> Result<Vec<EmissionSnapshot>, LoaderError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_snapshot_file(path))
        .collect();
    paths.sort();
    info!("Found {} snapshot files in {}", paths.len(), dir.display());

    let mut snapshots = Vec::new();
    for path in &paths {
        match load_snapshot_file(path) {
            Ok(mut loaded) => snapshots.append(&mut loaded),
            Err(e) => error!("Skipping snapshot file {}: {}", path.display(), e),
        }
    }

    let snapshots = merge_chronological(snapshots);
    if snapshots.is_empty() {
        return Err(LoaderError::Empty(dir.display().to_string()));
    }

    info!("Loaded {} hourly snapshots", snapshots.len());
    Ok(snapshots)
}

/// Parses a single collector file into snapshot records.
pub fn load_snapshot_file(path: &Path) -> Result<Vec<EmissionSnapshot>, LoaderError> {
    let raw = fs::read_to_string(path)?;
    let parsed: SnapshotFile = serde_json::from_str(&raw)
        .map_err(|e| LoaderError::Parse(path.display().to_string(), e.to_string()))?;

    Ok(parsed.samples.into_iter().map(Into::into).collect())
}

/// Sorts a merged snapshot stream by timestamp and drops duplicates,
/// keeping the first occurrence.
fn merge_chronological(mut snapshots: Vec<EmissionSnapshot>) -> Vec<EmissionSnapshot> {
    snapshots.sort_by_key(|snapshot| snapshot.timestamp);
    let before = snapshots.len();
    snapshots.dedup_by_key(|snapshot| snapshot.timestamp);
    if snapshots.len() < before {
        warn!(
            "Dropped {} duplicate snapshot timestamps",
            before - snapshots.len()
        );
    }
    snapshots
}

fn is_snapshot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("emissions_v2_") && name.ends_with(".json"))
        .unwrap_or(false)
}
