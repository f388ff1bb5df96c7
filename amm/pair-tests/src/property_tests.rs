use primitive_types::U512;
use proptest::prelude::*;
use stable_pair::*;

use crate::utils::*;

/// Up to ~18% of the 9 decimal reserve.
const MAX_AMOUNT_9: u64 = 1_000_000_000_000_000;

fn fee_params() -> impl Strategy<Value = FeeParams> {
    (0..=10_000u64, 0..=10_000u64)
        .prop_map(|(pool, beneficiary)| FeeParams::new(FEE_DENOM, pool, beneficiary).unwrap())
}

fn amp_coef() -> impl Strategy<Value = AmplificationCoefficient> {
    (0..=100_000u64, 0..=3u8)
        .prop_map(|(value, precision)| AmplificationCoefficient::new(value, precision).unwrap())
}

proptest! {
    #[test]
    fn exchange_is_monotonic(
        amount in 1..MAX_AMOUNT_9,
        step in 1..1_000_000_000u64,
    ) {
        let pair = scenario_pair();
        let smaller = pair.expected_exchange(amount.into(), &token_9(), &token_18()).unwrap();
        let larger = pair
            .expected_exchange((amount + step).into(), &token_9(), &token_18())
            .unwrap();
        prop_assert!(smaller.amount <= larger.amount);
    }

    #[test]
    fn round_trip_never_favors_trader(amount in 1..MAX_AMOUNT_9 / 10) {
        let pair = scenario_pair();
        let received = pair.expected_exchange(amount.into(), &token_9(), &token_18()).unwrap();
        prop_assume!(!received.amount.is_zero());
        let spend = pair
            .expected_spend_amount(received.amount, &token_9(), &token_18())
            .unwrap();
        prop_assert!(spend.amount >= Balance::from(amount));
    }

    #[test]
    fn fees_are_conserved(
        amount in 1..MAX_AMOUNT_9,
        fees in fee_params(),
    ) {
        let gross = scenario_pair_with_fees(FeeParams::zero())
            .expected_exchange(amount.into(), &token_9(), &token_18())
            .unwrap();
        let result = scenario_pair_with_fees(fees)
            .expected_exchange(amount.into(), &token_9(), &token_18())
            .unwrap();
        prop_assert_eq!(result.amount + result.pool_fee + result.beneficiary_fee, gross.amount);
        prop_assert_eq!(result.fee(), fees.apply_fee(gross.amount).unwrap().total_fee());
    }

    #[test]
    fn exchange_preserves_invariant(amount in 1..MAX_AMOUNT_9) {
        let pair = scenario_pair_with_fees(FeeParams::zero());
        let result = pair.expected_exchange(amount.into(), &token_9(), &token_18()).unwrap();
        let before = pair.invariant().unwrap();
        let after = invariant_after(&pair, 0, amount.into(), 1, result.amount);
        prop_assert!(abs_diff(before, after) <= U512::one());
    }

    #[test]
    fn decimals_do_not_change_direction(
        amount in 1..MAX_AMOUNT_9,
        amp in amp_coef(),
    ) {
        let balance = 5_000_000_000_000_000u128;
        let pair = setup_pair(
            &[9, 18],
            &[balance, balance * 1_000_000_000],
            amp,
            FeeParams::zero(),
        );
        let forward = pair.expected_exchange(amount.into(), &token_9(), &token_18()).unwrap();
        let backward = pair
            .expected_exchange(Balance::from(amount) * 1_000_000_000, &token_18(), &token_9())
            .unwrap();
        prop_assert_eq!(backward.amount, forward.amount / 1_000_000_000);
    }

    #[test]
    fn spend_quote_is_enough(
        wanted in 1..MAX_AMOUNT_9,
        amp in amp_coef(),
        fees in fee_params(),
    ) {
        let pair = setup_pair(
            &[18, 18],
            &[BALANCE_18, BALANCE_18 / 2],
            amp,
            fees,
        );
        let wanted = Balance::from(wanted) * 1_000;
        let spend = pair.expected_spend_amount(wanted, &token_9(), &token_18()).unwrap();
        let received = pair.expected_exchange(spend.amount, &token_9(), &token_18()).unwrap();
        prop_assert!(received.amount + 2 >= wanted);
    }
}
