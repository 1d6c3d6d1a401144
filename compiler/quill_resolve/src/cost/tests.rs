use super::*;
use proptest::prelude::*;

#[test]
fn bit_values_follow_the_cost_ladder() {
    assert_eq!(ConversionCost::PASS.bits(), 0);
    assert_eq!(ConversionCost::PASS_COSTLY.bits(), 1);
    assert_eq!(ConversionCost::IMPLICIT_CAST.bits(), 2);
    assert_eq!(ConversionCost::LOSING_PRECISION.bits(), 4);
    assert_eq!(ConversionCost::WARNING.bits(), 8);
    assert_eq!(ConversionCost::DEFAULT_VALUE.bits(), 16);
    assert_eq!(ConversionCost::NO_CONVERSION.bits(), 32);
    assert_eq!(ConversionCost::TOO_MANY_ARGS.bits(), 64);
    assert_eq!(ConversionCost::MISSING_ARGS.bits(), 128);
    assert_eq!(ConversionCost::ERROR.bits(), 256);
}

#[test]
fn acceptance_stops_at_no_conversion() {
    assert!(ConversionCost::PASS.is_accepted());
    assert!(ConversionCost::PASS.is_pass());
    assert!((ConversionCost::IMPLICIT_CAST | ConversionCost::DEFAULT_VALUE).is_accepted());
    assert!(!ConversionCost::NO_CONVERSION.is_accepted());
    assert!(!(ConversionCost::IMPLICIT_CAST | ConversionCost::TOO_MANY_ARGS).is_accepted());
}

#[test]
fn costs_order_numerically() {
    assert!(ConversionCost::PASS < ConversionCost::PASS_COSTLY);
    assert!(ConversionCost::IMPLICIT_CAST < ConversionCost::LOSING_PRECISION);
    assert!(
        ConversionCost::IMPLICIT_CAST | ConversionCost::WARNING < ConversionCost::DEFAULT_VALUE
    );
}

proptest! {
    #[test]
    fn adding_a_rejecting_bit_always_rejects(bits in 0u16..32, rejecting in 5u32..9) {
        let cost = ConversionCost::from_bits_truncate(bits) | ConversionCost::from_bits_truncate(1 << rejecting);
        prop_assert!(!cost.is_accepted());
    }

    #[test]
    fn combining_never_lowers_the_cost(a in 0u16..512, b in 0u16..512) {
        let a = ConversionCost::from_bits_truncate(a);
        let b = ConversionCost::from_bits_truncate(b);
        prop_assert!(a | b >= a);
        prop_assert!(a | b >= b);
    }
}
