//! Era length from runtime constants

use crate::chain::ChainAsset;
use crate::error::{Result, ServiceError};
use crate::provider::{RuntimeConstant, StorageProvider};
use crate::scale::{decode_u32, decode_u64};

/// `sessionsPerEra * epochDuration * expectedBlockTimeMs / 1000`
pub fn era_duration_from_constants(
    sessions_per_era: u32,
    epoch_duration_blocks: u64,
    expected_block_time_ms: u64,
) -> Result<u64> {
    (sessions_per_era as u64)
        .checked_mul(epoch_duration_blocks)
        .and_then(|blocks| blocks.checked_mul(expected_block_time_ms))
        .map(|millis| millis / 1000)
        .ok_or_else(|| ServiceError::Decoding("era duration overflows u64".to_string()))
}

async fn fetch_era_duration(storage: &dyn StorageProvider) -> Result<u64> {
    let (sessions, epoch, block_time) = tokio::join!(
        storage.fetch_constant(RuntimeConstant::SessionsPerEra),
        storage.fetch_constant(RuntimeConstant::EpochDuration),
        storage.fetch_constant(RuntimeConstant::ExpectedBlockTime),
    );

    era_duration_from_constants(
        decode_u32(&sessions?)?,
        decode_u64(&epoch?)?,
        decode_u64(&block_time?)?,
    )
}

/// Era length in seconds: the asset override, then runtime constants, then
/// `default_secs`
pub async fn resolve_era_duration(
    asset: &ChainAsset,
    storage: &dyn StorageProvider,
    default_secs: u64,
) -> u64 {
    if let Some(secs) = asset.era_duration_secs {
        return secs;
    }

    match fetch_era_duration(storage).await {
        Ok(secs) if secs > 0 => {
            log::debug!("[{}] era duration {}s", asset.label(), secs);
            secs
        }
        Ok(_) => {
            log::warn!(
                "⚠️  [{}] runtime reports a zero era duration, using {}s",
                asset.label(),
                default_secs
            );
            default_secs
        }
        Err(e) => {
            log::warn!(
                "⚠️  [{}] era duration unavailable ({}), using {}s",
                asset.label(),
                e,
                default_secs
            );
            default_secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kusama_like_constants() {
        // 6 sessions of 600 blocks at 6s
        assert_eq!(era_duration_from_constants(6, 600, 6_000).unwrap(), 21_600);
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(era_duration_from_constants(u32::MAX, u64::MAX, 2).is_err());
    }
}
