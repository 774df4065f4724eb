use crate::error::PortfolioError;
use chrono::{DateTime, Utc};
use core_types::SubnetId;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One dated allocation: the weights that take effect at `effective_date`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleEntry {
    pub effective_date: DateTime<Utc>,
    pub weights: HashMap<SubnetId, Decimal>,
}

/// An ordered table of dated target allocations.
///
/// Entries are strictly ascending by effective date; `effective_at` resolves
/// the allocation in force at a timestamp by binary search. Simulations that
/// start before the first entry get no allocation and simply hold cash until
/// one takes effect.
#[derive(Debug, Clone)]
pub struct WeightSchedule {
    entries: Vec<ScheduleEntry>,
}

impl WeightSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Result<Self, PortfolioError> {
        for (i, pair) in entries.windows(2).enumerate() {
            if pair[1].effective_date <= pair[0].effective_date {
                return Err(PortfolioError::UnorderedSchedule(i + 1));
            }
        }
        Ok(Self { entries })
    }

    /// Loads a schedule from a JSON file holding an array of entries.
    pub fn load(path: &Path) -> Result<Self, PortfolioError> {
        let raw = fs::read_to_string(path)?;
        let entries: Vec<ScheduleEntry> = serde_json::from_str(&raw)
            .map_err(|e| PortfolioError::Parse(path.display().to_string(), e.to_string()))?;
        Self::new(entries)
    }

    /// The weights in force at `timestamp`: the entry with the latest
    /// effective date not after it, or `None` before the first entry.
    pub fn effective_at(&self, timestamp: DateTime<Utc>) -> Option<&HashMap<SubnetId, Decimal>> {
        let idx = self
            .entries
            .partition_point(|entry| entry.effective_date <= timestamp);
        idx.checked_sub(1).map(|i| &self.entries[i].weights)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
