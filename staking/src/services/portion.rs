//! Era reward pool split evenly between validators

use stake_economics::PortionRewardCalculatorEngine;
use std::sync::Arc;

use crate::chain::ChainAsset;
use crate::config::ServiceConfig;
use crate::era_duration::resolve_era_duration;
use crate::error::Result;
use crate::history::fetch_era_rewards;
use crate::hub::Publisher;
use crate::operation::SharedEngine;
use crate::provider::{EraValidatorService, StorageProvider};
use crate::service::{poll_every, CalculatorService, SnapshotSource};

pub type PortionRewardCalculatorService = CalculatorService<PortionSnapshotSource>;

pub struct PortionSnapshotSource {
    asset: ChainAsset,
    config: ServiceConfig,
    storage: Arc<dyn StorageProvider>,
    era_validators: Arc<dyn EraValidatorService>,
}

impl PortionSnapshotSource {
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
        let (rewards, info) = tokio::join!(
            fetch_era_rewards(self.storage.as_ref(), self.config.history_depth),
            self.era_validators.fetch_info(),
        );
        let rewards = rewards?;
        let info = info?;

        log::info!(
            "[{}] snapshot: era {}, {} validators, {} rewarded eras",
            self.asset.label(),
            info.active_era,
            info.validators.len(),
            rewards.len()
        );

        Ok(Arc::new(PortionRewardCalculatorEngine::new(
            &info.validators,
            rewards.into_values(),
            self.asset.precision,
            era_duration,
        )))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for PortionSnapshotSource {
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
                    "⚠️  [{}] reward pool unavailable, will retry: {}",
                    source.asset.label(),
                    e
                ),
            }
        })
        .await;
    }
}
