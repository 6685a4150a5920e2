//! Points-weighted model paying rewards in a different asset
//!
//! Rewards are minted in a reward asset that trades against the staked
//! asset on a DEX. Absolute earnings stay denominated in the reward asset;
//! normalized returns compare rewards against stake, so they are priced in
//! the staked asset through `reward_asset_rate`.

use rust_decimal::Decimal;

use super::{ReturnModel, RewardPointsCalculatorEngine};
use crate::period::RewardCalculationResultType;
use crate::projection::RewardProjection;
use crate::types::{AccountId, EraRewardHistory, EraValidatorInfo};

#[derive(Debug)]
pub struct DexAdjustedRewardCalculatorEngine {
    base: RewardPointsCalculatorEngine,
    reward_asset_rate: Decimal,
}

impl DexAdjustedRewardCalculatorEngine {
    /// `reward_asset_rate` is the amount of staked asset one unit of the
    /// reward asset buys.
    pub fn new(
        validators: &[EraValidatorInfo],
        history: &EraRewardHistory,
        asset_precision: u16,
        reward_precision: u16,
        era_duration_secs: u64,
        history_depth: usize,
        reward_asset_rate: Decimal,
    ) -> Self {
        Self {
            base: RewardPointsCalculatorEngine::new(
                validators,
                history,
                asset_precision,
                reward_precision,
                era_duration_secs,
                history_depth,
            ),
            reward_asset_rate,
        }
    }

    pub fn reward_asset_rate(&self) -> Decimal {
        self.reward_asset_rate
    }

    pub fn base(&self) -> &RewardPointsCalculatorEngine {
        &self.base
    }
}

impl ReturnModel for DexAdjustedRewardCalculatorEngine {
    fn projection(&self) -> &RewardProjection {
        self.base.projection()
    }

    fn validator_daily_return(&self, account_id: &AccountId) -> Option<Decimal> {
        self.base.validator_daily_return(account_id)
    }

    fn max_daily_return(&self) -> Decimal {
        self.base.max_daily_return()
    }

    fn avg_daily_return(&self) -> Decimal {
        self.base.avg_daily_return()
    }

    fn reward_rate(&self, result_type: RewardCalculationResultType) -> Decimal {
        result_type.calculate_rate(self.reward_asset_rate)
    }
}
