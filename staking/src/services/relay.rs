//! NPoS relay chain: follows total issuance through a storage subscription

use stake_economics::{Balance, RelayRewardCalculatorEngine};
use std::sync::Arc;

use crate::chain::ChainAsset;
use crate::config::ServiceConfig;
use crate::era_duration::resolve_era_duration;
use crate::error::Result;
use crate::hub::Publisher;
use crate::operation::SharedEngine;
use crate::provider::{EraValidatorService, StoragePath, StorageProvider};
use crate::scale::decode_balance;
use crate::service::{CalculatorService, SnapshotSource};

pub type RelayRewardCalculatorService = CalculatorService<RelaySnapshotSource>;

pub struct RelaySnapshotSource {
    asset: ChainAsset,
    config: ServiceConfig,
    storage: Arc<dyn StorageProvider>,
    era_validators: Arc<dyn EraValidatorService>,
}

impl RelaySnapshotSource {
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

    async fn build_engine(&self, total_issuance: Balance, era_duration: u64) -> Result<SharedEngine> {
        let info = self.era_validators.fetch_info().await?;

        log::info!(
            "[{}] snapshot: era {}, {} validators, issuance {}",
            self.asset.label(),
            info.active_era,
            info.validators.len(),
            total_issuance
        );

        Ok(Arc::new(RelayRewardCalculatorEngine::new(
            &info.validators,
            total_issuance,
            self.asset.precision,
            era_duration,
            self.config.relay_inflation,
        )))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for RelaySnapshotSource {
    async fn acquire(self: Arc<Self>, publisher: Publisher<SharedEngine>) {
        let label = self.asset.label();

        let mut changes = match self.storage.subscribe(StoragePath::TotalIssuance).await {
            Ok(changes) => changes,
            Err(e) => {
                log::error!("[{}] total issuance subscription failed: {}", label, e);
                return;
            }
        };

        let era_duration = resolve_era_duration(
            &self.asset,
            self.storage.as_ref(),
            self.config.default_era_duration_secs,
        )
        .await;

        while let Some(change_set) = changes.recv().await {
            // Only the final state of a block matters
            let Some(change) = change_set.changes.last() else {
                continue;
            };

            let Some(bytes) = change.value() else {
                publisher.clear();
                continue;
            };

            let total_issuance = match decode_balance(bytes) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!(
                        "⚠️  [{}] undecodable total issuance, keeping previous snapshot: {}",
                        label,
                        e
                    );
                    continue;
                }
            };

            match self.build_engine(total_issuance, era_duration).await {
                Ok(engine) => {
                    publisher.publish(engine);
                }
                Err(e) => log::warn!("⚠️  [{}] era validators unavailable: {}", label, e),
            }
        }

        log::debug!("[{}] total issuance subscription closed", label);
    }
}
