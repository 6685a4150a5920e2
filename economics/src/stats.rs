//! Statistics over validator sets

use rust_decimal::Decimal;

/// Median of the commissions that still leave something for nominators.
///
/// Commissions `>= 1.0` mark validators that are not operating for
/// nominators and are excluded before the median is taken.
pub fn median_commission(commissions: impl IntoIterator<Item = Decimal>) -> Decimal {
    let profitable: Vec<Decimal> = commissions
        .into_iter()
        .filter(|commission| *commission < Decimal::ONE)
        .collect();

    median(profitable).unwrap_or(Decimal::ZERO)
}

/// Middle element, or the mean of the two middle elements for even counts
pub fn median(mut values: Vec<Decimal>) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    values.sort();
    let count = values.len();

    if count % 2 == 0 {
        Some((values[count / 2 - 1] + values[count / 2]) / Decimal::TWO)
    } else {
        Some(values[count / 2])
    }
}

/// Arithmetic mean, zero for an empty input
pub fn mean(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0u64), |(sum, count), value| {
            (sum.checked_add(value).unwrap_or(sum), count + 1)
        });

    crate::decimal::safe_div(sum, Decimal::from(count))
}
