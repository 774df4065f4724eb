use crate::error::YieldModelError;
use crate::YieldModel;
use core_types::SubnetId;
use rust_decimal::Decimal;

/// The same constant APY for every subnet. A deliberately dumb baseline,
/// also handy as a deterministic hook in simulator tests.
#[derive(Debug, Clone)]
pub struct FlatRateModel {
    apy_pct: f64,
}

impl FlatRateModel {
    pub fn new(apy_pct: f64) -> Result<Self, YieldModelError> {
        if apy_pct < 0.0 || !apy_pct.is_finite() {
            return Err(YieldModelError::InvalidParameters(
                "flat_apy_pct must be a non-negative number".to_string(),
            ));
        }
        Ok(Self { apy_pct })
    }
}

impl YieldModel for FlatRateModel {
    fn estimate_apy(&self, _subnet: SubnetId, _emission_fraction: Decimal) -> f64 {
        self.apy_pct
    }
}
