//! SCALE decoding of raw storage values and map keys

use codec::{Decode, DecodeAll, Encode};
use rust_decimal::Decimal;
use stake_economics::constants::PERBILL_DENOMINATOR;
use stake_economics::decimal::from_perbill;
use stake_economics::{AccountId, Balance, EraIndex, EraRewardPoints};
use std::collections::BTreeMap;

use crate::error::{Result, ServiceError};

/// Bytes of the `Twox64Concat` hash preceding an encoded map key
const TWOX64_HASH_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RawEraRewardPoints {
    pub total: u32,
    pub individual: BTreeMap<[u8; 32], u32>,
}

impl From<RawEraRewardPoints> for EraRewardPoints {
    fn from(raw: RawEraRewardPoints) -> Self {
        EraRewardPoints {
            total: raw.total,
            individual: raw
                .individual
                .into_iter()
                .map(|(account, points)| (AccountId::new(account), points))
                .collect(),
        }
    }
}

pub fn decode_balance(bytes: &[u8]) -> Result<Balance> {
    Ok(Balance::decode_all(&mut &bytes[..])?)
}

pub fn decode_u32(bytes: &[u8]) -> Result<u32> {
    Ok(u32::decode_all(&mut &bytes[..])?)
}

pub fn decode_u64(bytes: &[u8]) -> Result<u64> {
    Ok(u64::decode_all(&mut &bytes[..])?)
}

/// Perbill fraction, rejecting values above one
pub fn decode_perbill(bytes: &[u8]) -> Result<Decimal> {
    let parts = decode_u32(bytes)?;
    if parts > PERBILL_DENOMINATOR {
        return Err(ServiceError::Decoding(format!(
            "perbill out of range: {}",
            parts
        )));
    }
    Ok(from_perbill(parts))
}

pub fn decode_reward_points(bytes: &[u8]) -> Result<EraRewardPoints> {
    Ok(RawEraRewardPoints::decode_all(&mut &bytes[..])?.into())
}

pub fn decode_account_list(bytes: &[u8]) -> Result<Vec<AccountId>> {
    let accounts = Vec::<[u8; 32]>::decode_all(&mut &bytes[..])?;
    Ok(accounts.into_iter().map(AccountId::new).collect())
}

/// Era index of a `Twox64Concat(EraIndex)` map key: the trailing four
/// little-endian bytes
pub fn era_from_key(key: &[u8]) -> Result<EraIndex> {
    if key.len() < TWOX64_HASH_LEN + 4 {
        return Err(ServiceError::Decoding(format!(
            "storage key too short for an era index: 0x{}",
            hex::encode(key)
        )));
    }

    let mut era = &key[key.len() - 4..];
    Ok(EraIndex::decode(&mut era)?)
}

/// Reduce raw prefix entries to an era-indexed map.
///
/// A single undecodable entry fails the whole map so callers never mix
/// partial data into a snapshot.
pub fn decode_era_map<T>(
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    decode_value: impl Fn(&[u8]) -> Result<T>,
) -> Result<BTreeMap<EraIndex, T>> {
    entries
        .into_iter()
        .map(|(key, value)| Ok((era_from_key(&key)?, decode_value(&value)?)))
        .collect()
}

/// Build a `Twox64Concat` map key for an era; the hash part is zeroed since
/// decoding only reads the concatenated index
#[cfg(test)]
pub(crate) fn era_key(prefix: &[u8], era: EraIndex) -> Vec<u8> {
    let mut key = prefix.to_vec();
    key.extend_from_slice(&[0u8; TWOX64_HASH_LEN]);
    key.extend_from_slice(&era.encode());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decode_balance() {
        let raw: Balance = 12_345_678_901_234_567_890;
        assert_eq!(decode_balance(&raw.encode()).unwrap(), raw);
        // Trailing bytes are rejected
        let mut padded = raw.encode();
        padded.push(0);
        assert!(decode_balance(&padded).is_err());
        assert!(decode_balance(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_decode_perbill() {
        assert_eq!(
            decode_perbill(&200_000_000u32.encode()).unwrap(),
            Decimal::from_str("0.2").unwrap()
        );
        assert!(matches!(
            decode_perbill(&2_000_000_000u32.encode()),
            Err(ServiceError::Decoding(_))
        ));
    }

    #[test]
    fn test_decode_reward_points() {
        let raw = RawEraRewardPoints {
            total: 60,
            individual: BTreeMap::from([([1u8; 32], 20), ([2u8; 32], 40)]),
        };
        let points = decode_reward_points(&raw.encode()).unwrap();
        assert_eq!(points.total, 60);
        assert_eq!(points.points_of(&AccountId::new([2u8; 32])), 40);
    }

    #[test]
    fn test_decode_account_list() {
        let encoded = vec![[7u8; 32], [8u8; 32]].encode();
        let accounts = decode_account_list(&encoded).unwrap();
        assert_eq!(accounts, vec![AccountId::new([7u8; 32]), AccountId::new([8u8; 32])]);
    }

    #[test]
    fn test_era_from_key() {
        let key = era_key(b"Staking.ErasValidatorReward", 0x0102_0304);
        assert_eq!(era_from_key(&key).unwrap(), 0x0102_0304);
        assert!(era_from_key(&[0u8; 6]).is_err());
    }

    #[test]
    fn test_decode_era_map() {
        let entries = vec![
            (era_key(b"p", 5), 500u128.encode()),
            (era_key(b"p", 4), 400u128.encode()),
        ];
        let map = decode_era_map(entries, decode_balance).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(map[&5], 500);

        let broken = vec![(era_key(b"p", 1), vec![0xff])];
        assert!(decode_era_map(broken, decode_balance).is_err());
    }
}
