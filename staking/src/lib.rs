//! Staking Reward Calculator Services
//!
//! Asynchronous orchestration around the engines of `stake-economics`:
//! - Collaborator interfaces for storage, validators, collators and DEXes
//! - SCALE decoding of raw storage values
//! - A per-service snapshot hub queuing requests until chain state arrives
//! - One acquisition strategy per reward model
//!
//! ```no_run
//! # async fn demo(deps: stake_service::ServiceDependencies) -> stake_service::Result<()> {
//! use stake_service::{ChainAsset, RewardModel, ServiceConfig, ServiceFactory};
//! use stake_economics::{CalculationPeriod, RewardCalculatorEngine};
//! use rust_decimal::Decimal;
//!
//! let factory = ServiceFactory::new(ServiceConfig::default(), tokio::runtime::Handle::current())?;
//! let service = factory.create(
//!     ChainAsset::new("polkadot", 0, "DOT", 10),
//!     RewardModel::Relaychain,
//!     &deps,
//! )?;
//!
//! service.setup();
//! let engine = service.fetch_calculator_operation().await?;
//! let yearly = engine.calculate_avg_earnings(Decimal::from(100), true, CalculationPeriod::Year);
//! # let _ = yearly;
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod era_duration;
pub mod error;
pub mod factory;
pub mod history;
pub mod hub;
pub mod operation;
pub mod provider;
pub mod scale;
pub mod service;
pub mod services;

pub use chain::{ChainAsset, RewardModel};
pub use config::ServiceConfig;
pub use error::{ProviderError, Result, ServiceError};
pub use factory::{ServiceDependencies, ServiceFactory};
pub use hub::{Publisher, SnapshotHub};
pub use operation::{CalculatorOperation, SharedEngine};
pub use provider::{
    AssetRegistry, CollatorInfoProvider, DexId, DexQuoteService, EraValidatorService,
    ProviderResult, RuntimeConstant, StorageChange, StorageChangeSet, StoragePath,
    StorageProvider, SwapQuote,
};
pub use service::{CalculatorService, RewardCalculatorService, SnapshotSource};
