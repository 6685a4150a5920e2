//! Points-weighted reward pool model
//!
//! Each era the chain pays a single validator reward pool and splits it by
//! reward points. A validator's expected cut of the latest pool is its
//! average point count over the trailing history window relative to the
//! points handed out in the latest era.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::{ReturnModel, ValidatorSet, ValidatorStake};
use crate::decimal::{from_substrate_amount_or_zero, net_of_commission, safe_div, safe_mul};
use crate::projection::RewardProjection;
use crate::stats::mean;
use crate::types::{AccountId, EraRewardHistory, EraValidatorInfo};

#[derive(Debug)]
pub struct RewardPointsCalculatorEngine {
    validators: ValidatorSet,
    projection: RewardProjection,
    reward_pool: Decimal,
    latest_total_points: Decimal,
    average_points: HashMap<AccountId, Decimal>,
    average_stake: Decimal,
    max_validator: OnceLock<Option<ValidatorStake>>,
}

impl RewardPointsCalculatorEngine {
    /// Reward pools are decoded with `reward_precision`, stakes with
    /// `asset_precision`. Only the trailing `history_depth` eras count.
    pub fn new(
        validators: &[EraValidatorInfo],
        history: &EraRewardHistory,
        asset_precision: u16,
        reward_precision: u16,
        era_duration_secs: u64,
        history_depth: usize,
    ) -> Self {
        let history = history.clone().trailing(history_depth);
        let validators = ValidatorSet::new(validators, asset_precision);

        let latest_era = history
            .latest_rewarded_era()
            .or_else(|| history.reward_points.keys().next_back().copied());

        let reward_pool = history
            .validator_rewards
            .values()
            .next_back()
            .map(|raw| from_substrate_amount_or_zero(*raw, reward_precision))
            .unwrap_or(Decimal::ZERO);

        let latest_total_points = latest_era
            .and_then(|era| history.reward_points.get(&era))
            .map(|points| Decimal::from(points.total))
            .unwrap_or(Decimal::ZERO);

        // Eras without an entry for a validator count as zero points
        let era_count = Decimal::from(history.reward_points.len());
        let average_points: HashMap<AccountId, Decimal> = validators
            .iter()
            .map(|v| {
                let earned: u64 = history
                    .reward_points
                    .values()
                    .map(|era| era.points_of(&v.account_id) as u64)
                    .sum();
                (v.account_id, safe_div(Decimal::from(earned), era_count))
            })
            .collect();

        let average_stake = latest_era
            .and_then(|era| history.total_stake.get(&era))
            .map(|raw| {
                safe_div(
                    from_substrate_amount_or_zero(*raw, asset_precision),
                    Decimal::from(validators.len()),
                )
            })
            .filter(|stake| !stake.is_zero())
            .unwrap_or_else(|| validators.average_stake());

        Self {
            validators,
            projection: RewardProjection::new(era_duration_secs),
            reward_pool,
            latest_total_points,
            average_points,
            average_stake,
            max_validator: OnceLock::new(),
        }
    }

    pub fn reward_pool(&self) -> Decimal {
        self.reward_pool
    }

    pub fn average_points(&self, account_id: &AccountId) -> Decimal {
        self.average_points
            .get(account_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Expected share of the latest reward pool
    pub fn pool_allocation(&self, points: Decimal) -> Decimal {
        safe_div(safe_mul(self.reward_pool, points), self.latest_total_points)
    }

    /// Per-unit reward of one era
    pub fn era_return(&self, points: Decimal, stake: Decimal, commission: Decimal) -> Decimal {
        net_of_commission(safe_div(self.pool_allocation(points), stake), commission)
    }

    fn validator_era_return(&self, validator: &ValidatorStake) -> Decimal {
        self.era_return(
            self.average_points(&validator.account_id),
            validator.stake,
            validator.commission,
        )
    }

    fn daily(&self, era_return: Decimal) -> Decimal {
        safe_mul(era_return, self.projection.eras_per_day())
    }

    fn max_validator(&self) -> Option<&ValidatorStake> {
        self.max_validator
            .get_or_init(|| {
                self.validators
                    .max_by(|v| self.validator_era_return(v))
                    .cloned()
            })
            .as_ref()
    }
}

impl ReturnModel for RewardPointsCalculatorEngine {
    fn projection(&self) -> &RewardProjection {
        &self.projection
    }

    fn validator_daily_return(&self, account_id: &AccountId) -> Option<Decimal> {
        self.validators
            .get(account_id)
            .map(|v| self.daily(self.validator_era_return(v)))
    }

    fn max_daily_return(&self) -> Decimal {
        self.max_validator()
            .map(|v| self.daily(self.validator_era_return(v)))
            .unwrap_or(Decimal::ZERO)
    }

    fn avg_daily_return(&self) -> Decimal {
        let points = mean(self.validators.iter().map(|v| self.average_points(&v.account_id)));
        self.daily(self.era_return(
            points,
            self.average_stake,
            self.validators.median_commission(),
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::fixtures::*;
    use super::*;
    use crate::engines::RewardCalculatorEngine;
    use crate::period::CalculationPeriod;
    use crate::types::EraRewardPoints;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_pool_allocation_follows_points() {
        let (validators, history) = network();
        let engine = RewardPointsCalculatorEngine::new(&validators, &history, 18, 18, 86_400, 14);

        assert_eq!(engine.reward_pool(), Decimal::from(40));
        assert_eq!(engine.average_points(&account(1)), Decimal::from(300));
        // 40 * 300 / 400
        assert_eq!(engine.pool_allocation(Decimal::from(300)), Decimal::from(30));

        let earned = engine
            .calculate_earnings(Decimal::from(10), &account(1), false, CalculationPeriod::Day)
            .unwrap();
        // 30 / 100 stake per era, one era a day
        assert_eq!(earned, dec("3"));
    }

    #[test]
    fn test_max_and_avg() {
        let (validators, history) = network();
        let engine = RewardPointsCalculatorEngine::new(&validators, &history, 18, 18, 86_400, 14);

        let max = engine.calculate_max_earnings(Decimal::from(10), false, CalculationPeriod::Day);
        assert_eq!(max, dec("3"));

        // Mean points 200, average stake 100: 40 * 200 / 400 / 100
        let avg = engine.calculate_avg_earnings(Decimal::from(10), false, CalculationPeriod::Day);
        assert_eq!(avg, dec("2"));
    }

    #[test]
    fn test_missing_eras_count_as_zero() {
        let (validators, mut history) = network();
        history
            .reward_points
            .get_mut(&2)
            .unwrap()
            .individual
            .remove(&account(2));

        let engine = RewardPointsCalculatorEngine::new(&validators, &history, 18, 18, 86_400, 14);
        assert_eq!(engine.average_points(&account(2)), dec("200") / dec("3"));
    }

    #[test]
    fn test_window_ignores_old_eras() {
        let (validators, mut history) = network();
        // An ancient era with wildly different points falls outside a 3-era window
        history.reward_points.insert(
            0,
            EraRewardPoints {
                total: 10,
                individual: BTreeMap::from([(account(2), 10)]),
            },
        );
        history.validator_rewards.insert(0, UNIT);

        let engine = RewardPointsCalculatorEngine::new(&validators, &history, 18, 18, 86_400, 3);
        assert_eq!(engine.average_points(&account(2)), Decimal::from(100));
    }

    #[test]
    fn test_empty_history() {
        let (validators, _) = network();
        let engine = RewardPointsCalculatorEngine::new(
            &validators,
            &EraRewardHistory::default(),
            18,
            18,
            86_400,
            14,
        );
        assert_eq!(
            engine
                .calculate_earnings(Decimal::from(10), &account(1), true, CalculationPeriod::Year)
                .unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            engine.calculate_max_earnings(Decimal::from(10), true, CalculationPeriod::Year),
            Decimal::ZERO
        );
    }
}
