//! Builds the service variant matching a chain's reward model

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::chain::{ChainAsset, RewardModel};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::provider::{
    AssetRegistry, CollatorInfoProvider, DexQuoteService, EraValidatorService, StorageProvider,
};
use crate::service::{CalculatorService, RewardCalculatorService};
use crate::services::{
    DexAdjustedSnapshotSource, ParachainSnapshotSource, PortionSnapshotSource,
    RelaySnapshotSource, RewardPointsSnapshotSource,
};

/// Collaborators available for one chain
#[derive(Clone, Default)]
pub struct ServiceDependencies {
    pub storage: Option<Arc<dyn StorageProvider>>,
    pub era_validators: Option<Arc<dyn EraValidatorService>>,
    pub collators: Option<Arc<dyn CollatorInfoProvider>>,
    pub dex: Option<Arc<dyn DexQuoteService>>,
    pub assets: Option<Arc<dyn AssetRegistry>>,
}

impl ServiceDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(mut self, storage: Arc<dyn StorageProvider>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_era_validators(mut self, service: Arc<dyn EraValidatorService>) -> Self {
        self.era_validators = Some(service);
        self
    }

    pub fn with_collators(mut self, provider: Arc<dyn CollatorInfoProvider>) -> Self {
        self.collators = Some(provider);
        self
    }

    pub fn with_dex(mut self, service: Arc<dyn DexQuoteService>) -> Self {
        self.dex = Some(service);
        self
    }

    pub fn with_assets(mut self, registry: Arc<dyn AssetRegistry>) -> Self {
        self.assets = Some(registry);
        self
    }
}

fn require<T: ?Sized>(dependency: &Option<Arc<T>>, name: &'static str) -> Result<Arc<T>> {
    dependency
        .clone()
        .ok_or(ServiceError::MissingDependency(name))
}

pub struct ServiceFactory {
    config: ServiceConfig,
    runtime: Handle,
}

impl ServiceFactory {
    /// Services spawn their acquisition tasks on `runtime`
    pub fn new(config: ServiceConfig, runtime: Handle) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn create(
        &self,
        asset: ChainAsset,
        model: RewardModel,
        deps: &ServiceDependencies,
    ) -> Result<Arc<dyn RewardCalculatorService>> {
        let label = format!("{}/{}", asset.label(), model);
        let storage = require(&deps.storage, "storage provider")?;
        let config = self.config.clone();
        let timeout = self.config.request_timeout();
        let runtime = self.runtime.clone();

        let service: Arc<dyn RewardCalculatorService> = match model {
            RewardModel::Relaychain => {
                let validators = require(&deps.era_validators, "era validator service")?;
                Arc::new(CalculatorService::new(
                    label,
                    RelaySnapshotSource::new(asset, config, storage, validators),
                    runtime,
                    timeout,
                ))
            }
            RewardModel::Parachain => {
                let collators = require(&deps.collators, "collator info provider")?;
                Arc::new(CalculatorService::new(
                    label,
                    ParachainSnapshotSource::new(asset, config, storage, collators),
                    runtime,
                    timeout,
                ))
            }
            RewardModel::Portion => {
                let validators = require(&deps.era_validators, "era validator service")?;
                Arc::new(CalculatorService::new(
                    label,
                    PortionSnapshotSource::new(asset, config, storage, validators),
                    runtime,
                    timeout,
                ))
            }
            RewardModel::RewardPoints => {
                let validators = require(&deps.era_validators, "era validator service")?;
                Arc::new(CalculatorService::new(
                    label,
                    RewardPointsSnapshotSource::new(asset, config, storage, validators),
                    runtime,
                    timeout,
                ))
            }
            RewardModel::DexAdjusted => {
                let validators = require(&deps.era_validators, "era validator service")?;
                let dex = require(&deps.dex, "DEX quote service")?;
                let assets = require(&deps.assets, "asset registry")?;
                Arc::new(CalculatorService::new(
                    label,
                    DexAdjustedSnapshotSource::new(asset, config, storage, validators, dex, assets),
                    runtime,
                    timeout,
                ))
            }
        };

        log::debug!("created {} reward calculator service", model);
        Ok(service)
    }
}
