//! Service variants, one per chain reward model

pub mod dex_adjusted;
pub mod parachain;
pub mod portion;
pub mod relay;
pub mod reward_points;

pub use dex_adjusted::{DexAdjustedRewardCalculatorService, DexAdjustedSnapshotSource, RewardPricing};
pub use parachain::{ParachainRewardCalculatorService, ParachainSnapshotSource};
pub use portion::{PortionRewardCalculatorService, PortionSnapshotSource};
pub use relay::{RelayRewardCalculatorService, RelaySnapshotSource};
pub use reward_points::{RewardPointsCalculatorService, RewardPointsSnapshotSource};
