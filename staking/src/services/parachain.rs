//! Parachain collator staking: polls issuance, stake, commission and the
//! selected collators concurrently

use rust_decimal::Decimal;
use stake_economics::{Balance, ParachainRewardCalculatorEngine, ParachainStakingCandidateInfo};
use std::sync::Arc;

use crate::chain::ChainAsset;
use crate::config::ServiceConfig;
use crate::error::{ProviderError, Result};
use crate::hub::Publisher;
use crate::operation::SharedEngine;
use crate::provider::{CollatorInfoProvider, StoragePath, StorageProvider};
use crate::scale::{decode_account_list, decode_balance, decode_perbill};
use crate::service::{poll_every, CalculatorService, SnapshotSource};

pub type ParachainRewardCalculatorService = CalculatorService<ParachainSnapshotSource>;

pub struct ParachainSnapshotSource {
    asset: ChainAsset,
    config: ServiceConfig,
    storage: Arc<dyn StorageProvider>,
    collators: Arc<dyn CollatorInfoProvider>,
}

impl ParachainSnapshotSource {
    pub fn new(
        asset: ChainAsset,
        config: ServiceConfig,
        storage: Arc<dyn StorageProvider>,
        collators: Arc<dyn CollatorInfoProvider>,
    ) -> Self {
        Self {
            asset,
            config,
            storage,
            collators,
        }
    }

    async fn fetch_balance(&self, path: StoragePath) -> Result<Balance> {
        let bytes = self
            .storage
            .fetch(path)
            .await?
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))?;
        decode_balance(&bytes)
    }

    /// Chain-wide collator commission; zero when unavailable
    async fn fetch_commission(&self) -> Decimal {
        let result = match self.storage.fetch(StoragePath::CollatorCommission).await {
            Ok(Some(bytes)) => decode_perbill(&bytes),
            Ok(None) => Ok(Decimal::ZERO),
            Err(e) => Err(e.into()),
        };

        result.unwrap_or_else(|e| {
            log::warn!(
                "⚠️  [{}] collator commission unavailable, assuming 0: {}",
                self.asset.label(),
                e
            );
            Decimal::ZERO
        })
    }

    async fn fetch_selected_collators(&self) -> Result<Vec<ParachainStakingCandidateInfo>> {
        let accounts = match self.storage.fetch(StoragePath::SelectedCandidates).await? {
            Some(bytes) => decode_account_list(&bytes)?,
            None => Vec::new(),
        };

        if accounts.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.collators.fetch_candidates(&accounts).await?)
    }

    /// Selected collators; empty when unavailable
    async fn fetch_collators(&self) -> Vec<ParachainStakingCandidateInfo> {
        self.fetch_selected_collators().await.unwrap_or_else(|e| {
            log::warn!(
                "⚠️  [{}] collator list unavailable, continuing without collators: {}",
                self.asset.label(),
                e
            );
            Vec::new()
        })
    }

    async fn build_engine(&self) -> Result<SharedEngine> {
        let (issuance, staked, commission, collators) = tokio::join!(
            self.fetch_balance(StoragePath::TotalIssuance),
            self.fetch_balance(StoragePath::ParachainTotalStaked),
            self.fetch_commission(),
            self.fetch_collators(),
        );

        let issuance = issuance?;
        let staked = staked?;

        log::info!(
            "[{}] snapshot: {} collators, staked {} of {}",
            self.asset.label(),
            collators.len(),
            staked,
            issuance
        );

        let round_duration = self
            .asset
            .era_duration_secs
            .unwrap_or(self.config.default_era_duration_secs);

        Ok(Arc::new(ParachainRewardCalculatorEngine::new(
            issuance,
            staked,
            commission,
            collators,
            self.asset.precision,
            round_duration,
            self.config.parachain_annual_inflation,
        )))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for ParachainSnapshotSource {
    async fn acquire(self: Arc<Self>, publisher: Publisher<SharedEngine>) {
        let source = &self;
        let publisher = &publisher;

        poll_every(self.config.refresh_interval(), || async move {
            match source.build_engine().await {
                Ok(engine) => {
                    publisher.publish(engine);
                }
                Err(e) => log::warn!(
                    "⚠️  [{}] staking state unavailable, will retry: {}",
                    source.asset.label(),
                    e
                ),
            }
        })
        .await;
    }
}
