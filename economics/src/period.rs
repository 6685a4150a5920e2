//! Projection periods and result selectors

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::AccountId;

/// Time span an amount is projected over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationPeriod {
    Day,
    Week,
    Month,
    Year,
    Custom(u32),
}

impl CalculationPeriod {
    pub fn in_days(&self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => crate::constants::DAYS_IN_YEAR,
            Self::Custom(days) => *days,
        }
    }
}

impl fmt::Display for CalculationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
            Self::Custom(days) => write!(f, "{} days", days),
        }
    }
}

impl FromStr for CalculationPeriod {
    type Err = String;

    /// Accepts `day`, `week`, `month`, `year` or a number of days
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => other
                .parse::<u32>()
                .map(Self::Custom)
                .map_err(|_| format!("Invalid period: {}", s)),
        }
    }
}

/// How a projection is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardCalculationResultType {
    /// Normalized return compared against the staked asset
    Percentage,
    /// Absolute amount of the reward asset
    Value,
}

impl RewardCalculationResultType {
    /// Conversion rate from the reward asset into the staked asset.
    ///
    /// Percentages compare rewards against stake, so rewards must be
    /// priced in the staked asset. Absolute values stay in the reward asset.
    pub fn calculate_rate(&self, reward_asset_rate: Decimal) -> Decimal {
        match self {
            Self::Percentage => reward_asset_rate,
            Self::Value => Decimal::ONE,
        }
    }
}

/// Selector for normalized returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    /// Best validator, or the given one when pinned
    Max(Option<AccountId>),
    /// Average stake with median commission
    Avg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_days() {
        assert_eq!(CalculationPeriod::Day.in_days(), 1);
        assert_eq!(CalculationPeriod::Week.in_days(), 7);
        assert_eq!(CalculationPeriod::Month.in_days(), 30);
        assert_eq!(CalculationPeriod::Year.in_days(), 365);
        assert_eq!(CalculationPeriod::Custom(0).in_days(), 0);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Year".parse::<CalculationPeriod>(), Ok(CalculationPeriod::Year));
        assert_eq!(
            "45".parse::<CalculationPeriod>(),
            Ok(CalculationPeriod::Custom(45))
        );
        assert!("fortnight".parse::<CalculationPeriod>().is_err());
    }

    #[test]
    fn test_calculate_rate() {
        let rate = Decimal::new(35, 1);
        assert_eq!(RewardCalculationResultType::Percentage.calculate_rate(rate), rate);
        assert_eq!(
            RewardCalculationResultType::Value.calculate_rate(rate),
            Decimal::ONE
        );
    }
}
