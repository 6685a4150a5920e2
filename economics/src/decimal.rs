//! Conversions between raw on-chain integers and decimal values
//!
//! Raw amounts are scaled integers: a balance of `1_000_000_000_000` at
//! precision 10 is `100.0` tokens. Fractions such as commission are stored
//! as perbill (`0..=1_000_000_000`) or perquintill integers.

use rust_decimal::Decimal;

use crate::types::Balance;

/// Largest scale a `Decimal` can carry
pub const MAX_PRECISION: u16 = 28;

/// Convert a raw on-chain amount into a decimal value.
///
/// Returns `None` when the precision exceeds [`MAX_PRECISION`] or the
/// integral part does not fit into a `Decimal`.
pub fn from_substrate_amount(raw: Balance, precision: u16) -> Option<Decimal> {
    if precision > MAX_PRECISION {
        return None;
    }

    let divisor = 10u128.checked_pow(precision as u32)?;
    let whole = i128::try_from(raw / divisor).ok()?;
    let fraction = (raw % divisor) as i128;

    let whole = Decimal::try_from_i128_with_scale(whole, 0).ok()?;
    let fraction = Decimal::try_from_i128_with_scale(fraction, precision as u32).ok()?;

    whole.checked_add(fraction)
}

/// Convert a raw amount, treating anything unrepresentable as zero
pub fn from_substrate_amount_or_zero(raw: Balance, precision: u16) -> Decimal {
    from_substrate_amount(raw, precision).unwrap_or(Decimal::ZERO)
}

/// Convert a decimal value back into a raw on-chain amount (truncating).
pub fn to_substrate_amount(value: Decimal, precision: u16) -> Option<Balance> {
    if value.is_sign_negative() || precision > MAX_PRECISION {
        return None;
    }

    let mantissa = value.mantissa();
    let scale = value.scale();
    let precision = precision as u32;

    let raw = if precision >= scale {
        mantissa.checked_mul(10i128.checked_pow(precision - scale)?)?
    } else {
        mantissa / 10i128.checked_pow(scale - precision)?
    };

    Balance::try_from(raw).ok()
}

/// Decode a perbill integer (`1_000_000_000` == 1.0)
pub fn from_perbill(value: u32) -> Decimal {
    Decimal::from_i128_with_scale(value as i128, 9)
}

/// Decode a perquintill integer (`10^18` == 1.0)
pub fn from_perquintill(value: u64) -> Decimal {
    Decimal::from_i128_with_scale(value as i128, 18)
}

/// Division that yields zero instead of trapping on a zero divisor or overflow
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Multiplication that yields zero on overflow
pub fn safe_mul(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_mul(rhs).unwrap_or(Decimal::ZERO)
}

/// `value * (1 - commission)`, zero on overflow
pub fn net_of_commission(value: Decimal, commission: Decimal) -> Decimal {
    Decimal::ONE
        .checked_sub(commission)
        .map_or(Decimal::ZERO, |kept| safe_mul(value, kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_amount_conversion() {
        assert_eq!(
            from_substrate_amount(1_000_000_000_000, 10),
            Some(dec("100"))
        );
        assert_eq!(from_substrate_amount(12_345, 4), Some(dec("1.2345")));
        assert_eq!(from_substrate_amount(0, 18), Some(Decimal::ZERO));
    }

    #[test]
    fn test_amount_conversion_large_values() {
        // 350M tokens with 18 decimals
        let raw: Balance = 350_000_000 * 10u128.pow(18) + 5;
        let value = from_substrate_amount(raw, 18).unwrap();
        assert_eq!(value, dec("350000000.000000000000000005"));
    }

    #[test]
    fn test_amount_conversion_rejects_unrepresentable() {
        assert_eq!(from_substrate_amount(1, 29), None);
        assert_eq!(from_substrate_amount(Balance::MAX, 0), None);
        assert_eq!(from_substrate_amount_or_zero(Balance::MAX, 0), Decimal::ZERO);
    }

    #[test]
    fn test_to_substrate_amount() {
        assert_eq!(to_substrate_amount(dec("100"), 10), Some(1_000_000_000_000));
        assert_eq!(to_substrate_amount(dec("1.23456"), 2), Some(123));
        assert_eq!(to_substrate_amount(dec("-1"), 2), None);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(from_perbill(100_000_000), dec("0.1"));
        assert_eq!(from_perbill(1_000_000_000), Decimal::ONE);
        assert_eq!(from_perquintill(500_000_000_000_000_000), dec("0.5"));
    }

    #[test]
    fn test_net_of_commission() {
        assert_eq!(net_of_commission(Decimal::TEN, dec("0.1")), Decimal::from(9));
        assert_eq!(net_of_commission(Decimal::TEN, Decimal::ONE), Decimal::ZERO);
        // Out-of-range commissions saturate to zero instead of trapping
        assert_eq!(net_of_commission(Decimal::MAX, dec("-1")), Decimal::ZERO);
        assert_eq!(net_of_commission(Decimal::ONE, Decimal::MIN), Decimal::ZERO);
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(Decimal::ONE, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(Decimal::ONE, Decimal::TWO), dec("0.5"));
    }
}
