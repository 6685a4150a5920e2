//! Reward calculator engines
//!
//! Every chain reward model implements [`ReturnModel`], which reduces the
//! model to per-unit daily returns. [`RewardCalculatorEngine`] is provided
//! for every model on top of that, so callers only ever see the engine
//! contract.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;

use crate::decimal::{from_perbill, from_substrate_amount_or_zero, safe_div};
use crate::error::{CalculatorError, Result};
use crate::period::{CalculationPeriod, ReturnType, RewardCalculationResultType};
use crate::projection::RewardProjection;
use crate::stats::median_commission;
use crate::titles::{avg_title, max_title, RateKind};
use crate::types::{AccountId, EraValidatorInfo};

pub mod dex_adjusted;
pub mod parachain;
pub mod portion;
pub mod relay;
pub mod reward_points;

pub use dex_adjusted::DexAdjustedRewardCalculatorEngine;
pub use parachain::ParachainRewardCalculatorEngine;
pub use portion::PortionRewardCalculatorEngine;
pub use relay::{InflationParams, RelayRewardCalculatorEngine};
pub use reward_points::RewardPointsCalculatorEngine;

/// Yield projection contract shared by every reward model
pub trait RewardCalculatorEngine: Send + Sync + fmt::Debug {
    /// Earnings of `amount` staked with the given validator.
    ///
    /// Fails with [`CalculatorError::UnknownValidator`] when the validator is
    /// not part of the snapshot.
    fn calculate_earnings(
        &self,
        amount: Decimal,
        validator_account_id: &AccountId,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Result<Decimal>;

    /// Earnings of `amount` with the best validator of the snapshot
    fn calculate_max_earnings(
        &self,
        amount: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Decimal;

    /// Earnings of `amount` at average stake and median commission
    fn calculate_avg_earnings(
        &self,
        amount: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Decimal;

    /// Per-unit return, suitable for percentage display
    fn calculator_return(
        &self,
        is_compound: bool,
        period: CalculationPeriod,
        return_type: ReturnType,
    ) -> Decimal;

    fn avg_earning_title(&self, locale: &str) -> String;

    fn max_earnings_title(&self, locale: &str) -> String;
}

/// A chain reward model expressed as per-unit daily returns
pub trait ReturnModel: Send + Sync + fmt::Debug {
    fn projection(&self) -> &RewardProjection;

    /// Daily return per staked unit, `None` when the validator is unknown
    fn validator_daily_return(&self, account_id: &AccountId) -> Option<Decimal>;

    /// Daily return of the best validator
    fn max_daily_return(&self) -> Decimal;

    /// Daily return at average stake and median commission
    fn avg_daily_return(&self) -> Decimal;

    /// Rate converting rewards into the requested result type
    fn reward_rate(&self, _result_type: RewardCalculationResultType) -> Decimal {
        Decimal::ONE
    }

    fn rate_kind(&self) -> RateKind {
        RateKind::Apy
    }
}

fn project<M: ReturnModel + ?Sized>(
    model: &M,
    amount: Decimal,
    daily_return: Decimal,
    is_compound: bool,
    period: CalculationPeriod,
    result_type: RewardCalculationResultType,
) -> Decimal {
    let rate = model.reward_rate(result_type);
    let daily_return = daily_return.checked_mul(rate).unwrap_or(Decimal::ZERO);
    model
        .projection()
        .earnings(amount, daily_return, is_compound, period)
}

impl<M: ReturnModel> RewardCalculatorEngine for M {
    fn calculate_earnings(
        &self,
        amount: Decimal,
        validator_account_id: &AccountId,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Result<Decimal> {
        let daily_return = self
            .validator_daily_return(validator_account_id)
            .ok_or(CalculatorError::UnknownValidator(*validator_account_id))?;

        Ok(project(
            self,
            amount,
            daily_return,
            is_compound,
            period,
            RewardCalculationResultType::Value,
        ))
    }

    fn calculate_max_earnings(
        &self,
        amount: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Decimal {
        project(
            self,
            amount,
            self.max_daily_return(),
            is_compound,
            period,
            RewardCalculationResultType::Value,
        )
    }

    fn calculate_avg_earnings(
        &self,
        amount: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Decimal {
        project(
            self,
            amount,
            self.avg_daily_return(),
            is_compound,
            period,
            RewardCalculationResultType::Value,
        )
    }

    fn calculator_return(
        &self,
        is_compound: bool,
        period: CalculationPeriod,
        return_type: ReturnType,
    ) -> Decimal {
        let daily_return = match return_type {
            ReturnType::Max(Some(account_id)) => self
                .validator_daily_return(&account_id)
                .unwrap_or(Decimal::ZERO),
            ReturnType::Max(None) => self.max_daily_return(),
            ReturnType::Avg => self.avg_daily_return(),
        };

        project(
            self,
            Decimal::ONE,
            daily_return,
            is_compound,
            period,
            RewardCalculationResultType::Percentage,
        )
    }

    fn avg_earning_title(&self, locale: &str) -> String {
        avg_title(self.rate_kind(), locale)
    }

    fn max_earnings_title(&self, locale: &str) -> String {
        max_title(self.rate_kind(), locale)
    }
}

/// Validator with decoded stake and commission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorStake {
    pub account_id: AccountId,
    pub stake: Decimal,
    pub commission: Decimal,
}

impl ValidatorStake {
    pub fn decode(info: &EraValidatorInfo, precision: u16) -> Self {
        Self {
            account_id: info.account_id,
            stake: from_substrate_amount_or_zero(info.exposure.total, precision),
            commission: from_perbill(info.prefs.commission),
        }
    }
}

/// Decoded validator set with the statistics every model needs
#[derive(Debug, Clone)]
pub struct ValidatorSet {
    validators: Vec<ValidatorStake>,
    index: HashMap<AccountId, usize>,
    total_stake: Decimal,
    average_stake: Decimal,
    median_commission: Decimal,
}

impl ValidatorSet {
    pub fn new(validators: &[EraValidatorInfo], precision: u16) -> Self {
        let validators: Vec<ValidatorStake> = validators
            .iter()
            .map(|info| ValidatorStake::decode(info, precision))
            .collect();

        let mut index = HashMap::with_capacity(validators.len());
        for (position, validator) in validators.iter().enumerate() {
            index.entry(validator.account_id).or_insert(position);
        }

        let total_stake = validators.iter().fold(Decimal::ZERO, |sum, v| {
            sum.checked_add(v.stake).unwrap_or(sum)
        });
        let average_stake = safe_div(total_stake, Decimal::from(validators.len()));
        let median_commission = median_commission(validators.iter().map(|v| v.commission));

        Self {
            validators,
            index,
            total_stake,
            average_stake,
            median_commission,
        }
    }

    pub fn get(&self, account_id: &AccountId) -> Option<&ValidatorStake> {
        self.index.get(account_id).map(|&position| &self.validators[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidatorStake> {
        self.validators.iter()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn total_stake(&self) -> Decimal {
        self.total_stake
    }

    pub fn average_stake(&self) -> Decimal {
        self.average_stake
    }

    pub fn median_commission(&self) -> Decimal {
        self.median_commission
    }

    /// First validator with the highest score, in source order
    pub fn max_by(&self, score: impl Fn(&ValidatorStake) -> Decimal) -> Option<&ValidatorStake> {
        let mut best: Option<(&ValidatorStake, Decimal)> = None;

        for validator in &self.validators {
            let value = score(validator);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((validator, value)),
            }
        }

        best.map(|(validator, _)| validator)
    }
}
