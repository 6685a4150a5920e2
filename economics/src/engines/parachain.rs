//! Flat-rate collator model
//!
//! Parachain staking mints a fixed share of total issuance every year and
//! splits it across everything staked. Max earnings trust the externally
//! computed collator APR instead.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::ReturnModel;
use crate::constants::DAYS_IN_YEAR;
use crate::decimal::{from_substrate_amount_or_zero, net_of_commission, safe_div, safe_mul};
use crate::projection::RewardProjection;
use crate::titles::RateKind;
use crate::types::{AccountId, Balance, ParachainStakingCandidateInfo};

#[derive(Debug)]
pub struct ParachainRewardCalculatorEngine {
    projection: RewardProjection,
    collators: HashMap<AccountId, ParachainStakingCandidateInfo>,
    daily_return: Decimal,
    max_daily_return: Decimal,
}

impl ParachainRewardCalculatorEngine {
    /// `commission` is the chain-wide collator commission already decoded
    /// from perbill.
    pub fn new(
        total_issuance: Balance,
        total_staked: Balance,
        commission: Decimal,
        collators: Vec<ParachainStakingCandidateInfo>,
        asset_precision: u16,
        round_duration_secs: u64,
        annual_inflation: Decimal,
    ) -> Self {
        let issuance = from_substrate_amount_or_zero(total_issuance, asset_precision);
        let staked = from_substrate_amount_or_zero(total_staked, asset_precision);

        let annual_return = safe_div(safe_mul(issuance, annual_inflation), staked);
        let daily_return =
            net_of_commission(annual_return / Decimal::from(DAYS_IN_YEAR), commission);

        // First collator with the highest reported APR wins
        let best_apr = collators
            .iter()
            .filter_map(|c| c.subquery_data.as_ref().map(|data| data.apr))
            .fold(None, |best: Option<Decimal>, apr| match best {
                Some(current) if apr <= current => Some(current),
                _ => Some(apr),
            });

        let max_daily_return = best_apr
            .map(|apr| apr / Decimal::from(DAYS_IN_YEAR))
            .unwrap_or(daily_return);

        let mut by_account = HashMap::with_capacity(collators.len());
        for collator in collators {
            by_account.entry(collator.account_id).or_insert(collator);
        }

        Self {
            projection: RewardProjection::new(round_duration_secs),
            collators: by_account,
            daily_return,
            max_daily_return,
        }
    }

    pub fn collator(&self, account_id: &AccountId) -> Option<&ParachainStakingCandidateInfo> {
        self.collators.get(account_id)
    }

    pub fn collator_count(&self) -> usize {
        self.collators.len()
    }
}

impl ReturnModel for ParachainRewardCalculatorEngine {
    fn projection(&self) -> &RewardProjection {
        &self.projection
    }

    fn validator_daily_return(&self, account_id: &AccountId) -> Option<Decimal> {
        self.collators.get(account_id).map(|_| self.daily_return)
    }

    fn max_daily_return(&self) -> Decimal {
        self.max_daily_return
    }

    fn avg_daily_return(&self) -> Decimal {
        self.daily_return
    }

    fn rate_kind(&self) -> RateKind {
        RateKind::Apr
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::account;
    use super::*;
    use crate::engines::RewardCalculatorEngine;
    use crate::error::CalculatorError;
    use crate::period::{CalculationPeriod, ReturnType};
    use crate::types::CollatorSubqueryData;
    use std::str::FromStr;

    const UNIT: u128 = 1_000_000_000_000_000_000;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn collator(byte: u8, apr: Option<&str>) -> ParachainStakingCandidateInfo {
        ParachainStakingCandidateInfo {
            account_id: account(byte),
            bonded: 1_000 * UNIT,
            subquery_data: apr.map(|apr| CollatorSubqueryData { apr: dec(apr) }),
        }
    }

    fn engine(collators: Vec<ParachainStakingCandidateInfo>) -> ParachainRewardCalculatorEngine {
        // Half of the supply staked: 5% nominal yield
        ParachainRewardCalculatorEngine::new(
            1_000_000 * UNIT,
            500_000 * UNIT,
            Decimal::ZERO,
            collators,
            18,
            6 * 3600,
            dec("0.025"),
        )
    }

    #[test]
    fn test_flat_rate_yield() {
        let engine = engine(vec![collator(1, None)]);
        let earned = engine
            .calculate_earnings(Decimal::from(100), &account(1), false, CalculationPeriod::Year)
            .unwrap();
        assert!((earned - dec("5")).abs() < dec("0.000001"), "{}", earned);
        assert_eq!(
            engine.calculate_avg_earnings(Decimal::from(100), false, CalculationPeriod::Year),
            earned
        );
    }

    #[test]
    fn test_max_uses_reported_apr() {
        let engine = engine(vec![
            collator(1, Some("0.08")),
            collator(2, Some("0.12")),
            collator(3, None),
        ]);
        let max = engine.calculate_max_earnings(Decimal::from(100), false, CalculationPeriod::Year);
        assert!((max - dec("12")).abs() < dec("0.000001"), "{}", max);
    }

    #[test]
    fn test_max_falls_back_to_flat_rate() {
        let engine = engine(vec![collator(1, None)]);
        assert_eq!(
            engine.calculator_return(false, CalculationPeriod::Year, ReturnType::Max(None)),
            engine.calculator_return(false, CalculationPeriod::Year, ReturnType::Avg)
        );
    }

    #[test]
    fn test_collator_commission_reduces_yield() {
        let engine = ParachainRewardCalculatorEngine::new(
            1_000_000 * UNIT,
            500_000 * UNIT,
            dec("0.2"),
            vec![collator(1, None)],
            18,
            6 * 3600,
            dec("0.025"),
        );
        let earned = engine.calculate_avg_earnings(Decimal::from(100), false, CalculationPeriod::Year);
        assert!((earned - dec("4")).abs() < dec("0.000001"), "{}", earned);
    }

    #[test]
    fn test_unknown_collator() {
        let engine = engine(vec![collator(1, None)]);
        assert_eq!(
            engine.calculate_earnings(Decimal::ONE, &account(2), false, CalculationPeriod::Day),
            Err(CalculatorError::UnknownValidator(account(2)))
        );
    }

    #[test]
    fn test_nothing_staked() {
        let engine = ParachainRewardCalculatorEngine::new(
            1_000 * UNIT,
            0,
            Decimal::ZERO,
            Vec::new(),
            18,
            3600,
            dec("0.025"),
        );
        assert_eq!(
            engine.calculate_avg_earnings(Decimal::from(100), true, CalculationPeriod::Year),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_out_of_range_commission_yields_zero() {
        let engine = ParachainRewardCalculatorEngine::new(
            1_000_000 * UNIT,
            500_000 * UNIT,
            Decimal::MIN,
            vec![collator(1, None)],
            18,
            6 * 3600,
            dec("0.025"),
        );
        assert_eq!(
            engine.calculate_avg_earnings(Decimal::from(100), false, CalculationPeriod::Year),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_titles_say_apr() {
        let engine = engine(Vec::new());
        assert_eq!(engine.avg_earning_title("en"), "Average APR");
        assert_eq!(engine.max_earnings_title("ja"), "最大APR");
    }
}
