//! Points-weighted rewards paid in a separate asset priced on a DEX
//!
//! Before an engine can be built the service resolves the reward asset,
//! lists the DEX instances trading it against the staked asset and takes
//! the best quote. Any failure along that chain degrades to the configured
//! default rate instead of holding back the snapshot.

use futures::future::join_all;
use rust_decimal::Decimal;
use stake_economics::decimal::{from_substrate_amount, safe_div, to_substrate_amount};
use stake_economics::DexAdjustedRewardCalculatorEngine;
use std::sync::Arc;

use crate::chain::ChainAsset;
use crate::config::ServiceConfig;
use crate::era_duration::resolve_era_duration;
use crate::error::{ProviderError, Result, ServiceError};
use crate::history::fetch_reward_history;
use crate::hub::Publisher;
use crate::operation::SharedEngine;
use crate::provider::{AssetRegistry, DexQuoteService, EraValidatorService, StorageProvider, SwapQuote};
use crate::service::{poll_every, CalculatorService, SnapshotSource};

pub type DexAdjustedRewardCalculatorService = CalculatorService<DexAdjustedSnapshotSource>;

pub struct DexAdjustedSnapshotSource {
    asset: ChainAsset,
    config: ServiceConfig,
    storage: Arc<dyn StorageProvider>,
    era_validators: Arc<dyn EraValidatorService>,
    dex: Arc<dyn DexQuoteService>,
    assets: Arc<dyn AssetRegistry>,
}

/// Reward asset with its price in the staked asset
#[derive(Debug, Clone, PartialEq)]
pub struct RewardPricing {
    pub reward_asset: Option<ChainAsset>,
    pub rate: Decimal,
}

impl DexAdjustedSnapshotSource {
    pub fn new(
        asset: ChainAsset,
        config: ServiceConfig,
        storage: Arc<dyn StorageProvider>,
        era_validators: Arc<dyn EraValidatorService>,
        dex: Arc<dyn DexQuoteService>,
        assets: Arc<dyn AssetRegistry>,
    ) -> Self {
        Self {
            asset,
            config,
            storage,
            era_validators,
            dex,
            assets,
        }
    }

    /// Staked-asset amount one reward-asset unit buys at the best quote
    async fn quote_rate(&self, reward_asset: &ChainAsset) -> Result<Decimal> {
        let dexes = self.dex.available_dexes(reward_asset, &self.asset).await?;
        if dexes.is_empty() {
            return Err(ProviderError::NotFound(format!(
                "no DEX trades {} for {}",
                reward_asset.symbol, self.asset.symbol
            ))
            .into());
        }

        let amount_in = to_substrate_amount(self.config.dex_quote_amount, reward_asset.precision)
            .filter(|amount| *amount > 0)
            .ok_or_else(|| {
                ServiceError::Config(format!(
                    "dex_quote_amount {} is not representable",
                    self.config.dex_quote_amount
                ))
            })?;

        let quotes = join_all(
            dexes
                .iter()
                .map(|dex| self.dex.quote(*dex, reward_asset, &self.asset, amount_in)),
        )
        .await;

        let mut best: Option<SwapQuote> = None;
        for quote in quotes {
            match quote {
                Ok(quote) => {
                    if best.as_ref().map_or(true, |b| quote.amount_out > b.amount_out) {
                        best = Some(quote);
                    }
                }
                Err(e) => log::debug!("[{}] DEX quote failed: {}", self.asset.label(), e),
            }
        }

        let best = best.ok_or_else(|| ProviderError::NotFound("no DEX quote".to_string()))?;

        let amount_in = from_substrate_amount(best.amount_in, reward_asset.precision);
        let amount_out = from_substrate_amount(best.amount_out, self.asset.precision);
        let rate = match (amount_in, amount_out) {
            (Some(amount_in), Some(amount_out)) => safe_div(amount_out, amount_in),
            _ => Decimal::ZERO,
        };

        if rate.is_zero() {
            return Err(ServiceError::Decoding(format!(
                "unusable quote from DEX {}: {} -> {}",
                best.dex, best.amount_in, best.amount_out
            )));
        }

        log::debug!(
            "[{}] DEX {} quotes 1 {} = {} {}",
            self.asset.label(),
            best.dex,
            reward_asset.symbol,
            rate,
            self.asset.symbol
        );
        Ok(rate)
    }

    /// Resolve the reward asset and its rate, degrading to the configured
    /// default rate
    pub async fn reward_pricing(&self) -> RewardPricing {
        let reward_asset = match self.assets.reward_asset(&self.asset).await {
            Ok(Some(reward_asset)) => reward_asset,
            Ok(None) => {
                return RewardPricing {
                    reward_asset: None,
                    rate: Decimal::ONE,
                }
            }
            Err(e) => {
                log::warn!(
                    "⚠️  [{}] reward asset unresolved, using rate {}: {}",
                    self.asset.label(),
                    self.config.default_reward_rate,
                    e
                );
                return RewardPricing {
                    reward_asset: None,
                    rate: self.config.default_reward_rate,
                };
            }
        };

        let rate = match self.quote_rate(&reward_asset).await {
            Ok(rate) => rate,
            Err(e) => {
                log::warn!(
                    "⚠️  [{}] {} price unavailable, using rate {}: {}",
                    self.asset.label(),
                    reward_asset.symbol,
                    self.config.default_reward_rate,
                    e
                );
                self.config.default_reward_rate
            }
        };

        RewardPricing {
            reward_asset: Some(reward_asset),
            rate,
        }
    }

    async fn build_engine(&self, era_duration: u64) -> Result<SharedEngine> {
        let depth = self.config.history_depth;
        let (history, info, pricing) = tokio::join!(
            fetch_reward_history(self.storage.as_ref(), depth),
            self.era_validators.fetch_info(),
            self.reward_pricing(),
        );
        let history = history?;
        let info = info?;

        let reward_precision = pricing
            .reward_asset
            .as_ref()
            .map_or(self.asset.precision, |asset| asset.precision);

        log::info!(
            "[{}] snapshot: era {}, {} validators, reward rate {}",
            self.asset.label(),
            info.active_era,
            info.validators.len(),
            pricing.rate
        );

        Ok(Arc::new(DexAdjustedRewardCalculatorEngine::new(
            &info.validators,
            &history,
            self.asset.precision,
            reward_precision,
            era_duration,
            depth,
            pricing.rate,
        )))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for DexAdjustedSnapshotSource {
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
