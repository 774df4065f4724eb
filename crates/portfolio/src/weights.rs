use core_types::SubnetId;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Emission-weighted target allocation over the top `top_n` subnets.
///
/// Subnets are ranked by emission descending, ties broken toward the lower
/// subnet id so selection is deterministic, and weighted proportionally to
/// emission within the selected set. Returns an empty map when the selected
/// emissions sum to zero; callers must treat that as "no rebalance possible
/// this tick".
pub fn calculate_target_weights(
    emissions: &HashMap<SubnetId, Decimal>,
    top_n: usize,
) -> HashMap<SubnetId, Decimal> {
    let mut ranked: Vec<(SubnetId, Decimal)> = emissions
        .iter()
        .map(|(subnet, emission)| (*subnet, *emission))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(top_n);

    let total: Decimal = ranked.iter().map(|(_, emission)| *emission).sum();
    if total.is_zero() {
        return HashMap::new();
    }

    ranked
        .into_iter()
        .map(|(subnet, emission)| (subnet, emission / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn emissions(entries: &[(SubnetId, Decimal)]) -> HashMap<SubnetId, Decimal> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_top_n_proportional_weights() {
        let emissions = emissions(&[
            (1, dec!(0.30)),
            (2, dec!(0.20)),
            (3, dec!(0.10)),
            (4, dec!(0.05)),
        ]);
        let weights = calculate_target_weights(&emissions, 2);

        assert_eq!(weights.len(), 2);
        assert_eq!(weights[&1], dec!(0.6));
        assert_eq!(weights[&2], dec!(0.4));
        let total: Decimal = weights.values().copied().sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_ties_prefer_lower_subnet_id() {
        let emissions = emissions(&[(9, dec!(0.1)), (3, dec!(0.1)), (5, dec!(0.1))]);
        let weights = calculate_target_weights(&emissions, 2);

        assert!(weights.contains_key(&3));
        assert!(weights.contains_key(&5));
        assert!(!weights.contains_key(&9));
    }

    #[test]
    fn test_zero_total_emission_returns_empty() {
        let emissions = emissions(&[(1, dec!(0)), (2, dec!(0))]);
        assert!(calculate_target_weights(&emissions, 2).is_empty());
        assert!(calculate_target_weights(&HashMap::new(), 2).is_empty());
    }

    #[test]
    fn test_top_n_larger_than_universe() {
        let emissions = emissions(&[(1, dec!(0.4)), (2, dec!(0.1))]);
        let weights = calculate_target_weights(&emissions, 20);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[&1], dec!(0.8));
    }
}
