#![allow(dead_code)]

use codec::Encode;
use parking_lot::Mutex;
use stake_economics::{
    AccountId, Balance, EraIndex, EraStakersInfo, EraValidatorInfo, ParachainStakingCandidateInfo,
    ValidatorExposure, ValidatorPrefs,
};
use stake_service::scale::RawEraRewardPoints;
use stake_service::{
    AssetRegistry, ChainAsset, CollatorInfoProvider, DexId, DexQuoteService, EraValidatorService,
    ProviderError, ProviderResult, RuntimeConstant, StorageChange, StorageChangeSet, StoragePath,
    StorageProvider, SwapQuote,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

pub const UNIT: u128 = 1_000_000_000_000_000_000;

pub fn account(byte: u8) -> AccountId {
    AccountId::new([byte; 32])
}

pub fn validator(byte: u8, total: Balance, commission: u32) -> EraValidatorInfo {
    EraValidatorInfo {
        account_id: account(byte),
        exposure: ValidatorExposure {
            total,
            own: total,
            others: Vec::new(),
        },
        prefs: ValidatorPrefs {
            commission,
            blocked: false,
        },
    }
}

pub fn staked_asset() -> ChainAsset {
    ChainAsset::new("testnet", 0, "STK", 18).with_era_duration(86_400)
}

pub fn reward_asset() -> ChainAsset {
    ChainAsset::new("testnet", 1, "RWD", 18)
}

/// `Twox64Concat(era)` key with a zeroed hash part
pub fn era_key(era: EraIndex) -> Vec<u8> {
    let mut key = b"staking-map".to_vec();
    key.extend_from_slice(&[0u8; 8]);
    key.extend_from_slice(&era.encode());
    key
}

#[derive(Default)]
pub struct MockStorage {
    values: Mutex<HashMap<StoragePath, Vec<u8>>>,
    prefixes: Mutex<HashMap<StoragePath, Vec<(Vec<u8>, Vec<u8>)>>>,
    constants: Mutex<HashMap<RuntimeConstant, Vec<u8>>>,
    failing: Mutex<HashSet<StoragePath>>,
    subscribers: Mutex<Vec<mpsc::Sender<StorageChangeSet>>>,
    subscribe_calls: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&self, path: StoragePath, value: impl Encode) {
        self.values.lock().insert(path, value.encode());
    }

    pub fn set_raw(&self, path: StoragePath, bytes: Vec<u8>) {
        self.values.lock().insert(path, bytes);
    }

    pub fn set_prefix(&self, path: StoragePath, entries: Vec<(Vec<u8>, Vec<u8>)>) {
        self.prefixes.lock().insert(path, entries);
    }

    pub fn set_constant(&self, constant: RuntimeConstant, value: impl Encode) {
        self.constants.lock().insert(constant, value.encode());
    }

    pub fn fail(&self, path: StoragePath) {
        self.failing.lock().insert(path);
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    /// Deliver a change set to every open subscription
    pub async fn push(&self, changes: Vec<StorageChange>) {
        let subscribers: Vec<_> = self.subscribers.lock().clone();
        for subscriber in subscribers {
            let _ = subscriber
                .send(StorageChangeSet {
                    block_hash: None,
                    changes: changes.clone(),
                })
                .await;
        }
    }

    /// Populate reward history for `eras` with the given per-validator points
    pub fn set_reward_history(
        &self,
        eras: std::ops::RangeInclusive<EraIndex>,
        points: &[(u8, u32)],
        pool: Balance,
        total_stake: Balance,
    ) {
        let mut reward_points = Vec::new();
        let mut rewards = Vec::new();
        let mut stakes = Vec::new();

        for era in eras {
            let individual: BTreeMap<[u8; 32], u32> =
                points.iter().map(|(byte, p)| ([*byte; 32], *p)).collect();
            let raw = RawEraRewardPoints {
                total: individual.values().sum(),
                individual,
            };
            reward_points.push((era_key(era), raw.encode()));
            rewards.push((era_key(era), pool.encode()));
            stakes.push((era_key(era), total_stake.encode()));
        }

        self.set_prefix(StoragePath::ErasRewardPoints, reward_points);
        self.set_prefix(StoragePath::ErasValidatorReward, rewards);
        self.set_prefix(StoragePath::ErasTotalStake, stakes);
    }

    fn check(&self, path: StoragePath) -> ProviderResult<()> {
        if self.failing.lock().contains(&path) {
            return Err(ProviderError::Network(format!("{} unavailable", path)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StorageProvider for MockStorage {
    async fn fetch(&self, path: StoragePath) -> ProviderResult<Option<Vec<u8>>> {
        self.check(path)?;
        Ok(self.values.lock().get(&path).cloned())
    }

    async fn fetch_prefix(&self, path: StoragePath) -> ProviderResult<Vec<(Vec<u8>, Vec<u8>)>> {
        self.check(path)?;
        Ok(self.prefixes.lock().get(&path).cloned().unwrap_or_default())
    }

    async fn fetch_constant(&self, constant: RuntimeConstant) -> ProviderResult<Vec<u8>> {
        self.constants
            .lock()
            .get(&constant)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{:?}", constant)))
    }

    async fn subscribe(&self, path: StoragePath) -> ProviderResult<mpsc::Receiver<StorageChangeSet>> {
        self.check(path)?;
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);

        let (sender, receiver) = mpsc::channel(16);
        let current = self.values.lock().get(&path).cloned();
        if let Some(value) = current {
            let _ = sender.try_send(StorageChangeSet {
                block_hash: None,
                changes: vec![StorageChange::Insert {
                    key: path.to_string().into_bytes(),
                    value,
                }],
            });
        }

        self.subscribers.lock().push(sender);
        Ok(receiver)
    }
}

pub struct MockValidators {
    info: Mutex<EraStakersInfo>,
    failing: AtomicBool,
}

impl MockValidators {
    pub fn new(active_era: EraIndex, validators: Vec<EraValidatorInfo>) -> Self {
        Self {
            info: Mutex::new(EraStakersInfo {
                active_era,
                validators,
            }),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EraValidatorService for MockValidators {
    async fn fetch_info(&self) -> ProviderResult<EraStakersInfo> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("validators unavailable".to_string()));
        }
        Ok(self.info.lock().clone())
    }
}

pub struct MockCollators {
    pub candidates: Vec<ParachainStakingCandidateInfo>,
}

#[async_trait::async_trait]
impl CollatorInfoProvider for MockCollators {
    async fn fetch_candidates(
        &self,
        accounts: &[AccountId],
    ) -> ProviderResult<Vec<ParachainStakingCandidateInfo>> {
        Ok(self
            .candidates
            .iter()
            .filter(|candidate| accounts.contains(&candidate.account_id))
            .cloned()
            .collect())
    }
}

/// DEX answering with a fixed output per instance
#[derive(Default)]
pub struct MockDex {
    pub outputs: BTreeMap<DexId, Balance>,
    pub listing_fails: bool,
}

#[async_trait::async_trait]
impl DexQuoteService for MockDex {
    async fn available_dexes(
        &self,
        _from: &ChainAsset,
        _to: &ChainAsset,
    ) -> ProviderResult<Vec<DexId>> {
        if self.listing_fails {
            return Err(ProviderError::Network("dex settings unavailable".to_string()));
        }
        Ok(self.outputs.keys().copied().collect())
    }

    async fn quote(
        &self,
        dex: DexId,
        _from: &ChainAsset,
        _to: &ChainAsset,
        amount_in: Balance,
    ) -> ProviderResult<SwapQuote> {
        let amount_out = self
            .outputs
            .get(&dex)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(format!("dex {}", dex)))?;
        Ok(SwapQuote {
            dex,
            amount_in,
            amount_out,
        })
    }
}

pub struct MockAssets {
    pub reward: Option<ChainAsset>,
    pub failing: bool,
}

#[async_trait::async_trait]
impl AssetRegistry for MockAssets {
    async fn reward_asset(&self, _staked: &ChainAsset) -> ProviderResult<Option<ChainAsset>> {
        if self.failing {
            return Err(ProviderError::NotFound("chain registry".to_string()));
        }
        Ok(self.reward.clone())
    }
}

/// Route library logs to the test harness, `RUST_LOG=debug` to see them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
