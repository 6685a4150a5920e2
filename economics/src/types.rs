//! On-chain snapshot types consumed by the engines

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type Balance = u128;
pub type EraIndex = u32;

/// 32-byte validator/collator identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a hex string with or without `0x` prefix
    pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
        let trimmed = value.strip_prefix("0x").unwrap_or(value);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for AccountId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps logs readable
        let encoded = hex::encode(self.0);
        write!(f, "AccountId(0x{}..{})", &encoded[..8], &encoded[56..])
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// Stake of a single nominator behind a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualExposure {
    pub who: AccountId,
    pub value: Balance,
}

/// Total stake (self + nominators) backing a validator in an era
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidatorExposure {
    pub total: Balance,
    #[serde(default)]
    pub own: Balance,
    #[serde(default)]
    pub others: Vec<IndividualExposure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidatorPrefs {
    /// Perbill-encoded commission
    pub commission: u32,
    #[serde(default)]
    pub blocked: bool,
}

/// Per-era snapshot of one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraValidatorInfo {
    pub account_id: AccountId,
    pub exposure: ValidatorExposure,
    pub prefs: ValidatorPrefs,
}

/// Validator set of the active era
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EraStakersInfo {
    pub active_era: EraIndex,
    pub validators: Vec<EraValidatorInfo>,
}

/// Externally computed collator statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollatorSubqueryData {
    /// Annualized return as a fraction (0.12 == 12%)
    pub apr: Decimal,
}

/// Per-collator snapshot for parachain staking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParachainStakingCandidateInfo {
    pub account_id: AccountId,
    pub bonded: Balance,
    #[serde(default)]
    pub subquery_data: Option<CollatorSubqueryData>,
}

/// Reward points earned by validators in one era
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EraRewardPoints {
    pub total: u32,
    pub individual: BTreeMap<AccountId, u32>,
}

impl EraRewardPoints {
    pub fn points_of(&self, account_id: &AccountId) -> u32 {
        self.individual.get(account_id).copied().unwrap_or(0)
    }
}

/// Era-indexed reward history used by the points-weighted models
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EraRewardHistory {
    #[serde(default)]
    pub reward_points: BTreeMap<EraIndex, EraRewardPoints>,
    #[serde(default)]
    pub validator_rewards: BTreeMap<EraIndex, Balance>,
    #[serde(default)]
    pub total_stake: BTreeMap<EraIndex, Balance>,
}

impl EraRewardHistory {
    /// Most recent era with a paid-out validator reward pool
    pub fn latest_rewarded_era(&self) -> Option<EraIndex> {
        self.validator_rewards.keys().next_back().copied()
    }

    /// Keep only the trailing `depth` eras ending at the latest rewarded era.
    ///
    /// When no era has been rewarded yet the window ends at the latest era
    /// with reward points.
    pub fn trailing(mut self, depth: usize) -> Self {
        let latest = self
            .latest_rewarded_era()
            .or_else(|| self.reward_points.keys().next_back().copied());

        let Some(latest) = latest else {
            return self;
        };

        let depth = u32::try_from(depth).unwrap_or(u32::MAX).max(1);
        let first = latest.saturating_sub(depth - 1);
        let window = |era: &EraIndex| (first..=latest).contains(era);

        self.reward_points.retain(|era, _| window(era));
        self.validator_rewards.retain(|era, _| window(era));
        self.total_stake.retain(|era, _| window(era));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.reward_points.is_empty() && self.validator_rewards.is_empty()
    }
}

/// Keep the `depth` most recent entries of an era-indexed map
pub fn retain_latest_eras<T>(eras: &mut BTreeMap<EraIndex, T>, depth: usize) {
    while eras.len() > depth {
        eras.pop_first();
    }
}
