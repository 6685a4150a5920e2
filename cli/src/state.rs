//! Chain-state fixtures and engine construction
//!
//! A fixture is a JSON document holding the already-decoded chain state a
//! service would otherwise acquire from storage:
//!
//! ```json
//! {
//!   "asset": { "chain_id": "kusama", "asset_id": 0, "symbol": "KSM", "precision": 12 },
//!   "model": "relaychain",
//!   "total_issuance": 15000000000000000000,
//!   "validators": [ ... ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use stake_economics::{
    retain_latest_eras, Balance, DexAdjustedRewardCalculatorEngine, EraRewardHistory,
    EraValidatorInfo, ParachainRewardCalculatorEngine, ParachainStakingCandidateInfo,
    PortionRewardCalculatorEngine, RelayRewardCalculatorEngine, RewardCalculatorEngine,
    RewardPointsCalculatorEngine,
};
use stake_service::{ChainAsset, RewardModel, ServiceConfig};
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ChainState {
    pub asset: ChainAsset,

    /// Reward model used when none is given on the command line
    #[serde(default)]
    pub model: Option<RewardModel>,

    #[serde(default)]
    pub total_issuance: Balance,

    /// Parachain staking total
    #[serde(default)]
    pub total_staked: Balance,

    /// Collator commission as a fraction
    #[serde(default)]
    pub collator_commission: Decimal,

    #[serde(default)]
    pub validators: Vec<EraValidatorInfo>,

    #[serde(default)]
    pub collators: Vec<ParachainStakingCandidateInfo>,

    #[serde(default)]
    pub history: EraRewardHistory,

    /// Asset rewards are paid in, when it differs from the staked asset
    #[serde(default)]
    pub reward_asset: Option<ChainAsset>,

    /// Staked-asset price of one reward-asset unit
    #[serde(default)]
    pub reward_asset_rate: Option<Decimal>,
}

impl ChainState {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid chain state")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse state file {}", path.display()))
    }

    /// `requested` wins over the model recorded in the fixture
    pub fn resolve_model(&self, requested: Option<RewardModel>) -> Result<RewardModel> {
        match requested.or(self.model) {
            Some(model) => Ok(model),
            None => bail!(
                "No reward model for {}: pass --model or set \"model\" in the state file",
                self.asset.label()
            ),
        }
    }

    fn era_duration(&self, config: &ServiceConfig) -> u64 {
        self.asset
            .era_duration_secs
            .unwrap_or(config.default_era_duration_secs)
    }

    fn reward_precision(&self) -> u16 {
        self.reward_asset
            .as_ref()
            .map_or(self.asset.precision, |asset| asset.precision)
    }

    /// Engine for `model` built from this snapshot
    pub fn build_engine(
        &self,
        model: RewardModel,
        config: &ServiceConfig,
    ) -> Result<Box<dyn RewardCalculatorEngine>> {
        let era_duration = self.era_duration(config);
        let precision = self.asset.precision;

        let engine: Box<dyn RewardCalculatorEngine> = match model {
            RewardModel::Relaychain => {
                if self.validators.is_empty() {
                    log::warn!("⚠️  [{}] no validators in state", self.asset.label());
                }
                let engine = RelayRewardCalculatorEngine::new(
                    &self.validators,
                    self.total_issuance,
                    precision,
                    era_duration,
                    config.relay_inflation,
                );
                log::info!(
                    "[{}] staked portion {}, annual inflation {}",
                    self.asset.label(),
                    engine.staked_portion().round_dp(4),
                    engine.annual_inflation().round_dp(4)
                );
                Box::new(engine)
            }
            RewardModel::Parachain => Box::new(ParachainRewardCalculatorEngine::new(
                self.total_issuance,
                self.total_staked,
                self.collator_commission,
                self.collators.clone(),
                precision,
                era_duration,
                config.parachain_annual_inflation,
            )),
            RewardModel::Portion => {
                let mut rewards = self.history.validator_rewards.clone();
                retain_latest_eras(&mut rewards, config.history_depth);
                Box::new(PortionRewardCalculatorEngine::new(
                    &self.validators,
                    rewards.into_values(),
                    precision,
                    era_duration,
                ))
            }
            RewardModel::RewardPoints => Box::new(RewardPointsCalculatorEngine::new(
                &self.validators,
                &self.history,
                precision,
                self.reward_precision(),
                era_duration,
                config.history_depth,
            )),
            RewardModel::DexAdjusted => {
                let rate = self.reward_asset_rate.unwrap_or_else(|| {
                    log::warn!(
                        "⚠️  [{}] no reward asset rate in state, using {}",
                        self.asset.label(),
                        config.default_reward_rate
                    );
                    config.default_reward_rate
                });
                Box::new(DexAdjustedRewardCalculatorEngine::new(
                    &self.validators,
                    &self.history,
                    precision,
                    self.reward_precision(),
                    era_duration,
                    config.history_depth,
                    rate,
                ))
            }
        };

        log::debug!("[{}] built {} engine", self.asset.label(), model);
        Ok(engine)
    }
}
