//! Fixed reward pool per era, split evenly across the validator set

use rust_decimal::Decimal;
use std::sync::OnceLock;

use super::{ReturnModel, ValidatorSet, ValidatorStake};
use crate::decimal::{from_substrate_amount_or_zero, net_of_commission, safe_div, safe_mul};
use crate::projection::RewardProjection;
use crate::stats::mean;
use crate::types::{AccountId, Balance, EraValidatorInfo};

#[derive(Debug)]
pub struct PortionRewardCalculatorEngine {
    validators: ValidatorSet,
    projection: RewardProjection,
    average_reward_per_era: Decimal,
    max_validator: OnceLock<Option<ValidatorStake>>,
}

impl PortionRewardCalculatorEngine {
    /// `era_rewards` are the raw validator reward pools of recent eras
    pub fn new(
        validators: &[EraValidatorInfo],
        era_rewards: impl IntoIterator<Item = Balance>,
        asset_precision: u16,
        era_duration_secs: u64,
    ) -> Self {
        let average_reward_per_era = mean(
            era_rewards
                .into_iter()
                .map(|raw| from_substrate_amount_or_zero(raw, asset_precision)),
        );

        Self {
            validators: ValidatorSet::new(validators, asset_precision),
            projection: RewardProjection::new(era_duration_secs),
            average_reward_per_era,
            max_validator: OnceLock::new(),
        }
    }

    pub fn average_reward_per_era(&self) -> Decimal {
        self.average_reward_per_era
    }

    /// `(avgRewardPerEra / validatorCount) / stake * (1 - commission)`
    pub fn era_return(&self, stake: Decimal, commission: Decimal) -> Decimal {
        let portion = safe_div(
            self.average_reward_per_era,
            Decimal::from(self.validators.len()),
        );
        net_of_commission(safe_div(portion, stake), commission)
    }

    fn daily_return(&self, stake: Decimal, commission: Decimal) -> Decimal {
        safe_mul(self.era_return(stake, commission), self.projection.eras_per_day())
    }

    fn max_validator(&self) -> Option<&ValidatorStake> {
        self.max_validator
            .get_or_init(|| {
                self.validators
                    .max_by(|v| self.era_return(v.stake, v.commission))
                    .cloned()
            })
            .as_ref()
    }
}

impl ReturnModel for PortionRewardCalculatorEngine {
    fn projection(&self) -> &RewardProjection {
        &self.projection
    }

    fn validator_daily_return(&self, account_id: &AccountId) -> Option<Decimal> {
        self.validators
            .get(account_id)
            .map(|v| self.daily_return(v.stake, v.commission))
    }

    fn max_daily_return(&self) -> Decimal {
        self.max_validator()
            .map(|v| self.daily_return(v.stake, v.commission))
            .unwrap_or(Decimal::ZERO)
    }

    fn avg_daily_return(&self) -> Decimal {
        self.daily_return(
            self.validators.average_stake(),
            self.validators.median_commission(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::engines::RewardCalculatorEngine;
    use crate::period::CalculationPeriod;
    use std::str::FromStr;

    const UNIT: u128 = 1_000_000_000_000;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_average_reward_pool() {
        let engine = PortionRewardCalculatorEngine::new(
            &[validator(1, 1_000 * UNIT, 0)],
            vec![10 * UNIT, 20 * UNIT, 30 * UNIT],
            12,
            86_400,
        );
        assert_eq!(engine.average_reward_per_era(), Decimal::from(20));
    }

    #[test]
    fn test_per_validator_share() {
        // Pool of 20 split across two validators, 6-hour eras
        let engine = PortionRewardCalculatorEngine::new(
            &[
                validator(1, 1_000 * UNIT, 0),
                validator(2, 1_000 * UNIT, 500_000_000),
            ],
            vec![20 * UNIT],
            12,
            6 * 3600,
        );

        assert_eq!(engine.era_return(Decimal::from(1_000), Decimal::ZERO), dec("0.01"));

        let earned = engine
            .calculate_earnings(Decimal::from(100), &account(1), false, CalculationPeriod::Day)
            .unwrap();
        // 0.01 per era, four eras a day
        assert_eq!(earned, dec("4"));

        let halved = engine
            .calculate_earnings(Decimal::from(100), &account(2), false, CalculationPeriod::Day)
            .unwrap();
        assert_eq!(halved, dec("2"));
    }

    #[test]
    fn test_max_picks_thinnest_backing() {
        let engine = PortionRewardCalculatorEngine::new(
            &[
                validator(1, 2_000 * UNIT, 0),
                validator(2, 500 * UNIT, 0),
                validator(3, 500 * UNIT, 0),
            ],
            vec![30 * UNIT],
            12,
            86_400,
        );

        let max = engine.calculate_max_earnings(Decimal::from(50), false, CalculationPeriod::Week);
        let second = engine
            .calculate_earnings(Decimal::from(50), &account(2), false, CalculationPeriod::Week)
            .unwrap();
        assert_eq!(max, second);
    }

    #[test]
    fn test_no_rewards_yet() {
        let engine = PortionRewardCalculatorEngine::new(
            &[validator(1, 1_000 * UNIT, 0)],
            Vec::new(),
            12,
            86_400,
        );
        assert_eq!(
            engine.calculate_avg_earnings(Decimal::from(100), true, CalculationPeriod::Year),
            Decimal::ZERO
        );
    }
}
