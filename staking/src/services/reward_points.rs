//! Points-weighted reward pool over the trailing era history

use stake_economics::RewardPointsCalculatorEngine;
use std::sync::Arc;

use crate::chain::ChainAsset;
use crate::config::ServiceConfig;
use crate::era_duration::resolve_era_duration;
use crate::error::Result;
use crate::history::fetch_reward_history;
use crate::hub::Publisher;
use crate::operation::SharedEngine;
use crate::provider::{EraValidatorService, StorageProvider};
use crate::service::{poll_every, CalculatorService, SnapshotSource};

pub type RewardPointsCalculatorService = CalculatorService<RewardPointsSnapshotSource>;

pub struct RewardPointsSnapshotSource {
    asset: ChainAsset,
    config: ServiceConfig,
    storage: Arc<dyn StorageProvider>,
    era_validators: Arc<dyn EraValidatorService>,
}

impl RewardPointsSnapshotSource {
    pub fn new(
        asset: ChainAsset,
        config: ServiceConfig,
        storage: Arc<dyn StorageProvider>,
        era_validators: Arc<dyn EraValidatorService>,
    ) -> Self {
        Self {
            asset,
            config,
            storage,
            era_validators,
        }
    }

    async fn build_engine(&self, era_duration: u64) -> Result<SharedEngine> {
        let depth = self.config.history_depth;
        let (history, info) = tokio::join!(
            fetch_reward_history(self.storage.as_ref(), depth),
            self.era_validators.fetch_info(),
        );
        let history = history?;
        let info = info?;

        log::info!(
            "[{}] snapshot: era {}, {} validators, latest rewarded era {:?}",
            self.asset.label(),
            info.active_era,
            info.validators.len(),
            history.latest_rewarded_era()
        );

        Ok(Arc::new(RewardPointsCalculatorEngine::new(
            &info.validators,
            &history,
            self.asset.precision,
            self.asset.precision,
            era_duration,
            depth,
        )))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for RewardPointsSnapshotSource {
    async fn acquire(self: Arc<Self>, publisher: Publisher<SharedEngine>) {
        let era_duration = resolve_era_duration(
            &self.asset,
            self.storage.as_ref(),
            self.config.default_era_duration_secs,
        )
        .await;

        let source = &self;
        let publisher = &publisher;

        poll_every(self.config.refresh_interval(), || async move {
            match source.build_engine(era_duration).await {
                Ok(engine) => {
                    publisher.publish(engine);
                }
                Err(e) => log::warn!(
                    "⚠️  [{}] reward history unavailable, will retry: {}",
                    source.asset.label(),
                    e
                ),
            }
        })
        .await;
    }
}
