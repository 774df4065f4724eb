use crate::error::YieldModelError;
use crate::YieldModel;
use core_types::SubnetId;
use rust_decimal::prelude::*;

/// The default yield proxy: APY scales linearly with emission share.
///
/// `emission_to_daily_rate` converts an emission fraction into a daily yield
/// fraction, which is then annualized. The conversion constant is a
/// conservative placeholder for real validator dividend data, so the
/// resulting yields are deliberately small.
#[derive(Debug, Clone)]
pub struct EmissionRateModel {
    emission_to_daily_rate: f64,
}

impl EmissionRateModel {
    pub fn new(emission_to_daily_rate: f64) -> Result<Self, YieldModelError> {
        if emission_to_daily_rate < 0.0 || !emission_to_daily_rate.is_finite() {
            return Err(YieldModelError::InvalidParameters(
                "emission_to_daily_rate must be a non-negative number".to_string(),
            ));
        }
        Ok(Self {
            emission_to_daily_rate,
        })
    }
}

impl YieldModel for EmissionRateModel {
    fn estimate_apy(&self, _subnet: SubnetId, emission_fraction: Decimal) -> f64 {
        let emission = emission_fraction.to_f64().unwrap_or(0.0);
        emission * self.emission_to_daily_rate * 365.0 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apy_scales_with_emission() {
        let model = EmissionRateModel::new(0.0001).unwrap();
        let apy = model.estimate_apy(1, dec!(0.1));
        assert!((apy - 0.365).abs() < 1e-12);
        assert_eq!(model.estimate_apy(1, dec!(0)), 0.0);
        assert!(model.estimate_apy(2, dec!(0.2)) > apy);
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert!(EmissionRateModel::new(-0.1).is_err());
    }
}
