use crate::error::LoaderError;
use chrono::{DateTime, Utc};
use configuration::PriceModel;
use core_types::{EmissionSnapshot, SubnetId};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// The aligned, read-only market view a simulation replays: validated
/// emission snapshots plus one synthetic price series per subnet.
///
/// Price series are aligned 1:1 with snapshot indices and strictly positive
/// by construction, so indexed access inside the tick loop never has to
/// handle gaps.
#[derive(Debug, Clone)]
pub struct SnapshotTable {
    snapshots: Vec<EmissionSnapshot>,
    prices: HashMap<SubnetId, Vec<Decimal>>,
    subnet_ids: Vec<SubnetId>,
}

impl SnapshotTable {
    /// Validates the snapshot sequence and derives the synthetic price series
    /// for every subnet observed anywhere in it.
    pub fn build(
        snapshots: Vec<EmissionSnapshot>,
        model: &PriceModel,
    ) -> Result<Self, LoaderError> {
        validate_sequence(&snapshots)?;
        let subnet_ids = observed_subnets(&snapshots);
        debug!(
            "Building price series for {} subnets over {} ticks",
            subnet_ids.len(),
            snapshots.len()
        );
        let prices = build_price_series(&snapshots, &subnet_ids, model);
        Ok(Self {
            snapshots,
            prices,
            subnet_ids,
        })
    }

    /// Builds a table around an externally supplied price series, for callers
    /// that already hold real prices instead of the emission-derived proxy.
    /// Every series must align 1:1 with the snapshot indices.
    pub fn from_parts(
        snapshots: Vec<EmissionSnapshot>,
        prices: HashMap<SubnetId, Vec<Decimal>>,
    ) -> Result<Self, LoaderError> {
        validate_sequence(&snapshots)?;
        for (subnet, series) in &prices {
            if series.len() != snapshots.len() {
                return Err(LoaderError::MisalignedPrices(
                    *subnet,
                    series.len(),
                    snapshots.len(),
                ));
            }
        }

        let mut ids: BTreeSet<SubnetId> = prices.keys().copied().collect();
        ids.extend(observed_subnets(&snapshots));
        Ok(Self {
            snapshots,
            prices,
            subnet_ids: ids.into_iter().collect(),
        })
    }

    /// Number of ticks in the table.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[EmissionSnapshot] {
        &self.snapshots
    }

    /// Every subnet observed in the table, ascending.
    pub fn subnet_ids(&self) -> &[SubnetId] {
        &self.subnet_ids
    }

    /// The price vector at one tick. Subnets without a price series
    /// (possible only for `from_parts` tables) are simply absent.
    pub fn prices_at(&self, idx: usize) -> HashMap<SubnetId, Decimal> {
        self.prices
            .iter()
            .map(|(subnet, series)| (*subnet, series[idx]))
            .collect()
    }

    pub fn emissions_at(&self, idx: usize) -> &HashMap<SubnetId, Decimal> {
        &self.snapshots[idx].emissions
    }

    pub fn timestamp_at(&self, idx: usize) -> DateTime<Utc> {
        self.snapshots[idx].timestamp
    }

    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.snapshots[0].timestamp
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.snapshots[self.snapshots.len() - 1].timestamp
    }

    pub fn span_days(&self) -> f64 {
        let seconds = (self.last_timestamp() - self.first_timestamp()).num_seconds();
        seconds as f64 / 86_400.0
    }

    /// Full synthetic price history of one subnet.
    pub fn price_series(&self, subnet: SubnetId) -> Option<&[Decimal]> {
        self.prices.get(&subnet).map(|series| series.as_slice())
    }
}

/// The table is only usable if it has at least two ticks and its timestamps
/// strictly increase; duplicates were either collapsed by the file loader or
/// are a caller bug.
fn validate_sequence(snapshots: &[EmissionSnapshot]) -> Result<(), LoaderError> {
    if snapshots.len() < 2 {
        return Err(LoaderError::InsufficientSnapshots(snapshots.len()));
    }
    for (i, pair) in snapshots.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(LoaderError::OutOfOrder(i + 1));
        }
    }
    Ok(())
}

fn observed_subnets(snapshots: &[EmissionSnapshot]) -> Vec<SubnetId> {
    let mut ids = BTreeSet::new();
    for snapshot in snapshots {
        ids.extend(snapshot.emissions.keys().copied());
    }
    ids.into_iter().collect()
}

/// Derives each subnet's proxy price path from its emission history.
///
/// Per tick, the emission percentage change is damped, clipped to the model's
/// bounded range, and compounded onto the running price. A change whose
/// previous or current emission is zero counts as zero, so sparse subnets
/// hold their last price rather than collapsing.
fn build_price_series(
    snapshots: &[EmissionSnapshot],
    subnet_ids: &[SubnetId],
    model: &PriceModel,
) -> HashMap<SubnetId, Vec<Decimal>> {
    let mut prices = HashMap::with_capacity(subnet_ids.len());

    for &subnet in subnet_ids {
        let mut series = Vec::with_capacity(snapshots.len());
        let mut price = model.base_price;
        series.push(price);

        for pair in snapshots.windows(2) {
            let prev = pair[0].emission(subnet);
            let current = pair[1].emission(subnet);
            let pct_change = if prev.is_zero() || current.is_zero() {
                Decimal::ZERO
            } else {
                (current - prev) / prev
            };
            let shift = (pct_change * model.damping).clamp(-model.clip_pct, model.clip_pct);
            price *= Decimal::ONE + shift;
            series.push(price);
        }

        prices.insert(subnet, series);
    }

    prices
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn snapshot(hour: u32, emissions: &[(SubnetId, Decimal)]) -> EmissionSnapshot {
        EmissionSnapshot {
            timestamp: Utc.with_ymd_and_hms(2025, 10, 1, hour, 0, 0).unwrap(),
            block: 4_100_000 + u64::from(hour) * 300,
            emissions: emissions.iter().copied().collect(),
        }
    }

    #[test]
    fn test_rejects_short_and_unordered_sequences() {
        let model = PriceModel::default();
        let single = vec![snapshot(0, &[(1, dec!(0.1))])];
        assert!(matches!(
            SnapshotTable::build(single, &model),
            Err(LoaderError::InsufficientSnapshots(1))
        ));

        let unordered = vec![
            snapshot(1, &[(1, dec!(0.1))]),
            snapshot(0, &[(1, dec!(0.1))]),
        ];
        assert!(matches!(
            SnapshotTable::build(unordered, &model),
            Err(LoaderError::OutOfOrder(1))
        ));

        let duplicated = vec![
            snapshot(0, &[(1, dec!(0.1))]),
            snapshot(0, &[(1, dec!(0.1))]),
        ];
        assert!(SnapshotTable::build(duplicated, &model).is_err());
    }

    #[test]
    fn test_price_series_damps_clips_and_compounds() {
        // Subnet 1 rises 20%, subnet 2 falls 50%, subnet 3 explodes 99x,
        // subnet 4 only appears in the second snapshot.
        let snapshots = vec![
            snapshot(0, &[(1, dec!(0.10)), (2, dec!(0.10)), (3, dec!(0.001))]),
            snapshot(
                1,
                &[
                    (1, dec!(0.12)),
                    (2, dec!(0.05)),
                    (3, dec!(0.1)),
                    (4, dec!(0.02)),
                ],
            ),
        ];
        let table = SnapshotTable::build(snapshots, &PriceModel::default()).unwrap();

        assert_eq!(table.subnet_ids(), &[1, 2, 3, 4]);
        // +20% emission change, damped by 0.1 -> +2% price move.
        assert_eq!(table.price_series(1).unwrap(), &[dec!(100), dec!(102)]);
        // -50% emission change -> -5% price move.
        assert_eq!(table.price_series(2).unwrap(), &[dec!(100), dec!(95)]);
        // +9900% damped is +990%, clipped to +50%.
        assert_eq!(table.price_series(3).unwrap(), &[dec!(100), dec!(150)]);
        // No previous emission: the change counts as zero.
        assert_eq!(table.price_series(4).unwrap(), &[dec!(100), dec!(100)]);
    }

    #[test]
    fn test_vanishing_emission_holds_price() {
        let snapshots = vec![
            snapshot(0, &[(7, dec!(0.10))]),
            snapshot(1, &[(7, dec!(0.05))]),
            snapshot(2, &[]),
            snapshot(3, &[(7, dec!(0.05))]),
        ];
        let table = SnapshotTable::build(snapshots, &PriceModel::default()).unwrap();

        // The price drops with the emission, then holds flat through the gap.
        assert_eq!(
            table.price_series(7).unwrap(),
            &[dec!(100), dec!(95), dec!(95), dec!(95)]
        );
    }

    #[test]
    fn test_from_parts_validates_alignment() {
        let snapshots = vec![
            snapshot(0, &[(1, dec!(0.6))]),
            snapshot(1, &[(1, dec!(0.6))]),
        ];
        let misaligned = HashMap::from([(1u16, vec![dec!(1.0)])]);
        assert!(matches!(
            SnapshotTable::from_parts(snapshots.clone(), misaligned),
            Err(LoaderError::MisalignedPrices(1, 1, 2))
        ));

        let prices = HashMap::from([(1u16, vec![dec!(1.0), dec!(1.1)])]);
        let table = SnapshotTable::from_parts(snapshots, prices).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.prices_at(1)[&1], dec!(1.1));
    }

    #[test]
    fn test_span_days() {
        let snapshots = vec![
            snapshot(0, &[(1, dec!(0.1))]),
            snapshot(12, &[(1, dec!(0.1))]),
        ];
        let table = SnapshotTable::build(snapshots, &PriceModel::default()).unwrap();
        assert!((table.span_days() - 0.5).abs() < 1e-12);
    }
}
