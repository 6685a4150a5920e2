//! Era-indexed reward history from storage prefixes

use stake_economics::{retain_latest_eras, Balance, EraIndex, EraRewardHistory};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::provider::{StoragePath, StorageProvider};
use crate::scale::{decode_balance, decode_era_map, decode_reward_points};

/// Fetch reward points, validator reward pools and total stake concurrently
/// and keep the trailing `depth` eras
pub async fn fetch_reward_history(
    storage: &dyn StorageProvider,
    depth: usize,
) -> Result<EraRewardHistory> {
    let (points, rewards, stakes) = tokio::join!(
        storage.fetch_prefix(StoragePath::ErasRewardPoints),
        storage.fetch_prefix(StoragePath::ErasValidatorReward),
        storage.fetch_prefix(StoragePath::ErasTotalStake),
    );

    let history = EraRewardHistory {
        reward_points: decode_era_map(points?, decode_reward_points)?,
        validator_rewards: decode_era_map(rewards?, decode_balance)?,
        total_stake: decode_era_map(stakes?, decode_balance)?,
    };

    Ok(history.trailing(depth))
}

/// Validator reward pools of the trailing `depth` eras
pub async fn fetch_era_rewards(
    storage: &dyn StorageProvider,
    depth: usize,
) -> Result<BTreeMap<EraIndex, Balance>> {
    let entries = storage
        .fetch_prefix(StoragePath::ErasValidatorReward)
        .await?;
    let mut rewards = decode_era_map(entries, decode_balance)?;

    retain_latest_eras(&mut rewards, depth);

    Ok(rewards)
}
