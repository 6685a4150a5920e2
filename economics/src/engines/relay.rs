//! NPoS relay-chain inflation model
//!
//! Annual inflation follows the staking curve: it grows linearly with the
//! staked portion up to the ideal stake, then decays exponentially. Stakers
//! share the inflation in proportion to how thinly their validator is
//! backed compared to the average validator.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{ReturnModel, ValidatorSet, ValidatorStake};
use crate::constants::DAYS_IN_YEAR;
use crate::decimal::{from_substrate_amount_or_zero, net_of_commission, safe_div, safe_mul};
use crate::projection::RewardProjection;
use crate::types::{AccountId, Balance, EraValidatorInfo};

/// Parameters of the NPoS inflation curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationParams {
    pub min_inflation: Decimal,
    pub ideal_inflation: Decimal,
    pub ideal_stake_portion: Decimal,
    pub decay_rate: Decimal,
}

impl Default for InflationParams {
    fn default() -> Self {
        Self {
            min_inflation: Decimal::new(25, 3),
            ideal_inflation: Decimal::new(1, 1),
            ideal_stake_portion: Decimal::new(75, 2),
            decay_rate: Decimal::new(5, 2),
        }
    }
}

impl InflationParams {
    /// Annual inflation for the given staked portion of total issuance
    pub fn annual_inflation(&self, staked_portion: Decimal) -> Decimal {
        let ideal_interest = safe_div(self.ideal_inflation, self.ideal_stake_portion);

        if staked_portion <= self.ideal_stake_portion {
            let slope = ideal_interest - safe_div(self.min_inflation, self.ideal_stake_portion);
            self.min_inflation + staked_portion * slope
        } else {
            // 2^((ideal - staked) / decay), with a negative exponent
            let exponent = safe_div(staked_portion - self.ideal_stake_portion, self.decay_rate);
            let falloff = Decimal::TWO
                .checked_powd(exponent)
                .map(|growth| safe_div(Decimal::ONE, growth))
                .unwrap_or(Decimal::ZERO);

            self.min_inflation
                + (ideal_interest * self.ideal_stake_portion - self.min_inflation) * falloff
        }
    }
}

#[derive(Debug)]
pub struct RelayRewardCalculatorEngine {
    validators: ValidatorSet,
    projection: RewardProjection,
    staked_portion: Decimal,
    annual_inflation: Decimal,
    max_validator: OnceLock<Option<ValidatorStake>>,
}

impl RelayRewardCalculatorEngine {
    pub fn new(
        validators: &[EraValidatorInfo],
        total_issuance: Balance,
        asset_precision: u16,
        era_duration_secs: u64,
        params: InflationParams,
    ) -> Self {
        let validators = ValidatorSet::new(validators, asset_precision);
        let total_issuance = from_substrate_amount_or_zero(total_issuance, asset_precision);
        let staked_portion = safe_div(validators.total_stake(), total_issuance);
        let annual_inflation = params.annual_inflation(staked_portion);

        Self {
            validators,
            projection: RewardProjection::new(era_duration_secs),
            staked_portion,
            annual_inflation,
            max_validator: OnceLock::new(),
        }
    }

    pub fn staked_portion(&self) -> Decimal {
        self.staked_portion
    }

    pub fn annual_inflation(&self) -> Decimal {
        self.annual_inflation
    }

    /// `inflation * avgStake / (stakedPortion * stake) * (1 - commission)`
    pub fn annual_return(&self, stake: Decimal, commission: Decimal) -> Decimal {
        let backing = safe_mul(self.staked_portion, stake);
        let share = safe_div(
            safe_mul(self.annual_inflation, self.validators.average_stake()),
            backing,
        );
        net_of_commission(share, commission)
    }

    fn daily_return(&self, stake: Decimal, commission: Decimal) -> Decimal {
        self.annual_return(stake, commission) / Decimal::from(DAYS_IN_YEAR)
    }

    fn max_validator(&self) -> Option<&ValidatorStake> {
        self.max_validator
            .get_or_init(|| {
                self.validators
                    .max_by(|v| self.annual_return(v.stake, v.commission))
                    .cloned()
            })
            .as_ref()
    }
}

impl ReturnModel for RelayRewardCalculatorEngine {
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
