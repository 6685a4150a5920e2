//! Staking Reward Economics
//!
//! Projects staking yields (APR/APY) from on-chain snapshot data under the
//! reward models of the supported chain families:
//! - NPoS relay-chain inflation curve
//! - Flat-rate parachain collator inflation
//! - Fixed era reward pool split between validators
//! - Reward-points weighted era pool
//! - Reward-points weighted pool paid in a DEX-priced reward asset
//!
//! Engines are immutable once constructed and can be queried from any thread.

pub mod decimal;
pub mod engines;
pub mod error;
pub mod period;
pub mod projection;
pub mod stats;
pub mod titles;
pub mod types;

pub use engines::{
    DexAdjustedRewardCalculatorEngine, InflationParams, ParachainRewardCalculatorEngine,
    PortionRewardCalculatorEngine, RelayRewardCalculatorEngine, ReturnModel,
    RewardCalculatorEngine, RewardPointsCalculatorEngine,
};
pub use error::{CalculatorError, Result};
pub use period::{CalculationPeriod, ReturnType, RewardCalculationResultType};
pub use projection::RewardProjection;
pub use titles::RateKind;
pub use types::{
    retain_latest_eras, AccountId, Balance, CollatorSubqueryData, EraIndex, EraRewardHistory,
    EraRewardPoints, EraStakersInfo, EraValidatorInfo, IndividualExposure,
    ParachainStakingCandidateInfo, ValidatorExposure, ValidatorPrefs,
};

/// Economic constants
pub mod constants {
    /// Seconds in one day
    pub const SECONDS_PER_DAY: u64 = 86_400;

    /// Days used to annualize a daily rate
    pub const DAYS_IN_YEAR: u32 = 365;

    /// Denominator of a perbill fraction
    pub const PERBILL_DENOMINATOR: u32 = 1_000_000_000;

    /// Denominator of a perquintill fraction
    pub const PERQUINTILL_DENOMINATOR: u64 = 1_000_000_000_000_000_000;

    /// Trailing eras used for reward-points statistics
    pub const DEFAULT_HISTORY_DEPTH: usize = 14;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(constants::SECONDS_PER_DAY, 24 * 60 * 60);
        assert_eq!(constants::PERBILL_DENOMINATOR, 10u32.pow(9));
        assert_eq!(constants::PERQUINTILL_DENOMINATOR, 10u64.pow(18));
    }
}
