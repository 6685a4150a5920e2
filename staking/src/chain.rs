//! Chain asset metadata and reward model selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stakeable (or reward-paying) asset on a specific chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainAsset {
    pub chain_id: String,
    pub asset_id: u32,
    pub symbol: String,
    /// Decimal places of raw on-chain amounts
    pub precision: u16,
    /// Overrides the era (or round) length resolved from runtime constants
    #[serde(default)]
    pub era_duration_secs: Option<u64>,
}

impl ChainAsset {
    pub fn new(
        chain_id: impl Into<String>,
        asset_id: u32,
        symbol: impl Into<String>,
        precision: u16,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            asset_id,
            symbol: symbol.into(),
            precision,
            era_duration_secs: None,
        }
    }

    pub fn with_era_duration(mut self, secs: u64) -> Self {
        self.era_duration_secs = Some(secs);
        self
    }

    /// Short label used in log lines
    pub fn label(&self) -> String {
        format!("{}:{}", self.chain_id, self.symbol)
    }
}

impl fmt::Display for ChainAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.symbol, self.chain_id)
    }
}

/// Reward model of a chain family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardModel {
    /// NPoS inflation curve
    Relaychain,
    /// Flat-rate collator inflation
    Parachain,
    /// Fixed reward pool per era
    Portion,
    /// Points-weighted reward pool
    RewardPoints,
    /// Points-weighted pool paid in a DEX-priced reward asset
    DexAdjusted,
}

impl RewardModel {
    pub const ALL: [RewardModel; 5] = [
        RewardModel::Relaychain,
        RewardModel::Parachain,
        RewardModel::Portion,
        RewardModel::RewardPoints,
        RewardModel::DexAdjusted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardModel::Relaychain => "relaychain",
            RewardModel::Parachain => "parachain",
            RewardModel::Portion => "portion",
            RewardModel::RewardPoints => "reward_points",
            RewardModel::DexAdjusted => "dex_adjusted",
        }
    }
}

impl fmt::Display for RewardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        RewardModel::ALL
            .into_iter()
            .find(|model| model.as_str() == normalized)
            .ok_or_else(|| format!("Unknown reward model: {}", s))
    }
}
