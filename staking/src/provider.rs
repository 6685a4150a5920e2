//! Collaborator interfaces
//!
//! The reward-calculation core does not talk to a node itself. Storage
//! access, era validator snapshots, collator statistics, DEX quotes and the
//! asset registry are supplied by the embedding application through these
//! traits.

use stake_economics::{AccountId, Balance, EraStakersInfo, ParachainStakingCandidateInfo};
use tokio::sync::mpsc;

use crate::chain::ChainAsset;
use crate::error::ProviderError;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Storage items read by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoragePath {
    /// `Balances.TotalIssuance`
    TotalIssuance,
    /// `Staking.ErasRewardPoints`, keyed by era
    ErasRewardPoints,
    /// `Staking.ErasValidatorReward`, keyed by era
    ErasValidatorReward,
    /// `Staking.ErasTotalStake`, keyed by era
    ErasTotalStake,
    /// `ParachainStaking.Total`
    ParachainTotalStaked,
    /// `ParachainStaking.CollatorCommission`
    CollatorCommission,
    /// `ParachainStaking.SelectedCandidates`
    SelectedCandidates,
}

impl StoragePath {
    pub fn module(&self) -> &'static str {
        match self {
            StoragePath::TotalIssuance => "Balances",
            StoragePath::ErasRewardPoints
            | StoragePath::ErasValidatorReward
            | StoragePath::ErasTotalStake => "Staking",
            StoragePath::ParachainTotalStaked
            | StoragePath::CollatorCommission
            | StoragePath::SelectedCandidates => "ParachainStaking",
        }
    }

    pub fn item(&self) -> &'static str {
        match self {
            StoragePath::TotalIssuance => "TotalIssuance",
            StoragePath::ErasRewardPoints => "ErasRewardPoints",
            StoragePath::ErasValidatorReward => "ErasValidatorReward",
            StoragePath::ErasTotalStake => "ErasTotalStake",
            StoragePath::ParachainTotalStaked => "Total",
            StoragePath::CollatorCommission => "CollatorCommission",
            StoragePath::SelectedCandidates => "SelectedCandidates",
        }
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module(), self.item())
    }
}

/// Runtime constants needed to derive the era length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeConstant {
    /// `Staking.SessionsPerEra` (u32)
    SessionsPerEra,
    /// `Babe.EpochDuration` in blocks (u64)
    EpochDuration,
    /// `Babe.ExpectedBlockTime` in milliseconds (u64)
    ExpectedBlockTime,
}

/// One entry of a storage change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChange {
    Insert { key: Vec<u8>, value: Vec<u8> },
    Update { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl StorageChange {
    /// New value for inserts and updates, `None` for deletes
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            StorageChange::Insert { value, .. } | StorageChange::Update { value, .. } => {
                Some(value)
            }
            StorageChange::Delete { .. } => None,
        }
    }
}

/// Ordered changes delivered together for one block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageChangeSet {
    pub block_hash: Option<String>,
    pub changes: Vec<StorageChange>,
}

/// Raw storage access for one chain
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// SCALE-encoded value, `None` when the item is empty
    async fn fetch(&self, path: StoragePath) -> ProviderResult<Option<Vec<u8>>>;

    /// Every key/value pair under a map prefix
    async fn fetch_prefix(&self, path: StoragePath) -> ProviderResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// SCALE-encoded runtime constant
    async fn fetch_constant(&self, constant: RuntimeConstant) -> ProviderResult<Vec<u8>>;

    /// Change notifications for a single storage item, starting with its
    /// current value
    async fn subscribe(&self, path: StoragePath) -> ProviderResult<mpsc::Receiver<StorageChangeSet>>;
}

/// Validator exposures of the active era
#[async_trait::async_trait]
pub trait EraValidatorService: Send + Sync {
    async fn fetch_info(&self) -> ProviderResult<EraStakersInfo>;
}

/// Collator statistics for parachain staking
#[async_trait::async_trait]
pub trait CollatorInfoProvider: Send + Sync {
    async fn fetch_candidates(
        &self,
        accounts: &[AccountId],
    ) -> ProviderResult<Vec<ParachainStakingCandidateInfo>>;
}

/// DEX instance identifier
pub type DexId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub dex: DexId,
    pub amount_in: Balance,
    pub amount_out: Balance,
}

/// Swap quotes across the DEX instances of a chain
#[async_trait::async_trait]
pub trait DexQuoteService: Send + Sync {
    /// DEX instances trading the given pair
    async fn available_dexes(&self, from: &ChainAsset, to: &ChainAsset) -> ProviderResult<Vec<DexId>>;

    async fn quote(
        &self,
        dex: DexId,
        from: &ChainAsset,
        to: &ChainAsset,
        amount_in: Balance,
    ) -> ProviderResult<SwapQuote>;
}

/// Chain registry lookups
#[async_trait::async_trait]
pub trait AssetRegistry: Send + Sync {
    /// Asset staking rewards are paid in, `None` when it is the staked asset
    async fn reward_asset(&self, staked: &ChainAsset) -> ProviderResult<Option<ChainAsset>>;
}
