//! Service configuration
//!
//! Every key is optional; a missing key takes its default. Example:
//!
//! ```toml
//! request_timeout_secs = 30
//! history_depth = 14
//! default_reward_rate = "1"
//!
//! [relay_inflation]
//! min_inflation = "0.025"
//! ideal_inflation = "0.1"
//! ideal_stake_portion = "0.75"
//! decay_rate = "0.05"
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stake_economics::constants::{DEFAULT_HISTORY_DEPTH, SECONDS_PER_DAY};
use stake_economics::InflationParams;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ServiceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bounded wait for a pending calculator request
    pub request_timeout_secs: u64,

    /// Poll period of the fetch-and-poll acquisition strategies
    pub refresh_interval_secs: u64,

    /// Trailing eras used for reward-points statistics
    pub history_depth: usize,

    /// Reward asset rate used when DEX price resolution fails
    pub default_reward_rate: Decimal,

    /// Era length used when runtime constants are unavailable
    pub default_era_duration_secs: u64,

    /// Flat-rate collator model inflation
    pub parachain_annual_inflation: Decimal,

    /// Notional amount of reward asset quoted on the DEX
    pub dex_quote_amount: Decimal,

    pub relay_inflation: InflationParams,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            refresh_interval_secs: 300,
            history_depth: DEFAULT_HISTORY_DEPTH,
            default_reward_rate: Decimal::ONE,
            default_era_duration_secs: SECONDS_PER_DAY,
            parachain_annual_inflation: Decimal::new(25, 3),
            dex_quote_amount: Decimal::ONE,
            relay_inflation: InflationParams::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.history_depth == 0 {
            return Err(ServiceError::Config(
                "history_depth must be greater than zero".to_string(),
            ));
        }
        if self.default_reward_rate <= Decimal::ZERO {
            return Err(ServiceError::Config(format!(
                "default_reward_rate must be positive, got {}",
                self.default_reward_rate
            )));
        }

        let ideal = self.relay_inflation.ideal_stake_portion;
        if ideal <= Decimal::ZERO || ideal > Decimal::ONE {
            return Err(ServiceError::Config(format!(
                "relay_inflation.ideal_stake_portion must be in (0, 1], got {}",
                ideal
            )));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        // A zero interval would spin the poll loop
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}
