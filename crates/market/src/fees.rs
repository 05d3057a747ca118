//! Service fee policy.
//!
//! The platform charges a flat 5% of the agreed price. The fee is always
//! recomputed from the price on the client and is read-only in every form;
//! the submitting party can never edit it independently.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use peerrent_core::round_money;

/// Flat platform fee rate.
pub const SERVICE_FEE_RATE: Decimal = dec!(0.05);

/// Fee owed for a given agreed price, rounded to cents.
pub fn service_fee(price: Decimal) -> Decimal {
    round_money(price * SERVICE_FEE_RATE)
}

/// Price plus fee: what the buyer actually pays.
pub fn total_with_fee(price: Decimal) -> Decimal {
    price + service_fee(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fee_for_two_thousand_is_one_hundred() {
        assert_eq!(service_fee(dec!(2000.00)), dec!(100.00));
        assert_eq!(total_with_fee(dec!(2000.00)), dec!(2100.00));
    }

    #[test]
    fn fee_rounds_to_cents() {
        // 19.99 * 0.05 = 0.9995 -> 1.00
        assert_eq!(service_fee(dec!(19.99)), dec!(1.00));
        // 0.10 * 0.05 = 0.005 -> 0.01 (half away from zero)
        assert_eq!(service_fee(dec!(0.10)), dec!(0.01));
    }

    #[test]
    fn zero_price_carries_zero_fee() {
        assert_eq!(service_fee(dec!(0)), dec!(0.00));
        assert_eq!(total_with_fee(dec!(0)), dec!(0.00));
    }

    proptest! {
        #[test]
        fn fee_is_derived_and_total_is_price_plus_fee(cents in 0u64..=1_000_000_000) {
            let price = Decimal::new(cents as i64, 2);
            let fee = service_fee(price);
            prop_assert_eq!(fee, round_money(price * SERVICE_FEE_RATE));
            prop_assert_eq!(total_with_fee(price), price + fee);
            prop_assert!(fee >= Decimal::ZERO);
        }
    }
}
