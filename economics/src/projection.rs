//! Simple and compounded reward projection

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::constants::SECONDS_PER_DAY;
use crate::decimal::{safe_div, safe_mul};
use crate::period::CalculationPeriod;

/// Projects a daily rate over a period.
///
/// Rewards are paid out once per era (or round), so compounding happens
/// `eras_per_day` times a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardProjection {
    eras_per_day: Decimal,
}

impl RewardProjection {
    pub fn new(era_duration_secs: u64) -> Self {
        Self {
            eras_per_day: safe_div(
                Decimal::from(SECONDS_PER_DAY),
                Decimal::from(era_duration_secs),
            ),
        }
    }

    pub fn eras_per_day(&self) -> Decimal {
        self.eras_per_day
    }

    /// Earnings of `amount` at `daily_rate` over `period`.
    ///
    /// Returns zero when the era duration is unknown (zero).
    pub fn earnings(
        &self,
        amount: Decimal,
        daily_rate: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Decimal {
        if self.eras_per_day.is_zero() {
            return Decimal::ZERO;
        }

        let days = Decimal::from(period.in_days());

        if is_compound {
            self.compound(amount, daily_rate, days)
        } else {
            safe_mul(safe_mul(amount, daily_rate), days)
        }
    }

    /// `P * (1 + r/n)^(n*t) - P`
    fn compound(&self, amount: Decimal, daily_rate: Decimal, days: Decimal) -> Decimal {
        let payouts = safe_mul(days, self.eras_per_day);
        let base = Decimal::ONE + safe_div(daily_rate, self.eras_per_day);

        match pow(base, payouts) {
            Some(factor) => safe_mul(amount, factor) - amount,
            None => Decimal::ZERO,
        }
    }
}

/// `base^exponent`, exact for integral exponents
pub(crate) fn pow(base: Decimal, exponent: Decimal) -> Option<Decimal> {
    if exponent.fract().is_zero() {
        base.checked_powi(exponent.to_i64()?)
    } else {
        base.checked_powd(exponent)
    }
}
