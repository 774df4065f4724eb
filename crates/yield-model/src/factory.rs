use crate::emission_rate::EmissionRateModel;
use crate::error::YieldModelError;
use crate::flat_rate::FlatRateModel;
use crate::stake_ratio::StakeRatioModel;
use crate::YieldModel;
use configuration::YieldModelConfig;
use core_types::YieldModelId;
use tracing::debug;

/// Creates a new yield model instance based on the provided configuration.
///
/// The compiler will error if a new `YieldModelId` is added but not handled
/// here, which keeps the enum and the factory in lockstep.
pub fn create_model(config: &YieldModelConfig) -> Result<Box<dyn YieldModel>, YieldModelError> {
    debug!("Building yield model {:?}", config.model);
    match config.model {
        YieldModelId::EmissionRate => Ok(Box::new(EmissionRateModel::new(
            config.emission_to_daily_rate,
        )?)),
        YieldModelId::StakeRatio => {
            let supplies = config
                .supplies
                .iter()
                .map(|entry| (entry.subnet, entry.alpha_supply))
                .collect();
            Ok(Box::new(StakeRatioModel::new(supplies)))
        }
        YieldModelId::FlatRate => Ok(Box::new(FlatRateModel::new(config.flat_apy_pct)?)),
    }
}
