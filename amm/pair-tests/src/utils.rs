use primitive_types::U512;
use stable_pair::*;
use tracing_subscriber::EnvFilter;

pub const TOKEN_9: &str = "0000000000000000000000000000000000000000000000000000000000000000";
pub const TOKEN_18: &str = "1111111111111111111111111111111111111111111111111111111111111111";

pub const BALANCE_9: u128 = 5530869000000000;
pub const BALANCE_18: u128 = 5514989303312229845534954;
pub const LP_SUPPLY: u128 = 5711020512957239363328239;

pub const FEE_DENOM: u64 = 1_000_000;
pub const POOL_FEE: u64 = 3_000;

/// Set `RUST_LOG=trace` to see the quotes.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub fn token(hex_id: &str) -> TokenId {
    hex_id
        .parse()
        .unwrap_or_else(|err| panic!("SETUP: bad token id {hex_id}: {err}"))
}

pub fn token_9() -> TokenId {
    token(TOKEN_9)
}

pub fn token_18() -> TokenId {
    token(TOKEN_18)
}

/// Pair with tokens `[0x00.., 0x11.., 0x22.., ...]` in slots `0..n`.
pub fn setup_pair(
    decimals: &[u8],
    balances: &[u128],
    amp_coef: AmplificationCoefficient,
    fees: FeeParams,
) -> StablePair {
    if decimals.len() != balances.len() {
        panic!("SETUP: Inconsistent number of tokens.")
    }
    init_tracing();
    let token_data = decimals
        .iter()
        .zip(balances.iter())
        .map(|(&decimals, &balance)| TokenDataInput::new(decimals, balance))
        .collect();
    let token_index = (0..decimals.len() as u8).map(|slot| (TokenId::new([slot * 0x11; 32]), slot));
    StablePair::new(
        token_data,
        token_index,
        amp_coef,
        fees,
        Balance::from(LP_SUPPLY),
    )
    .unwrap_or_else(|err| panic!("SETUP: Should create pair. Err: {err:?}"))
}

/// 9 and 18 decimal tokens, A = 8.5, 0.3% pool fee.
pub fn scenario_pair() -> StablePair {
    scenario_pair_with_fees(FeeParams::new(FEE_DENOM, POOL_FEE, 0).unwrap())
}

pub fn scenario_pair_with_fees(fees: FeeParams) -> StablePair {
    setup_pair(
        &[9, 18],
        &[BALANCE_9, BALANCE_18],
        AmplificationCoefficient::new(85, 1).unwrap(),
        fees,
    )
}

/// Invariant of `pair` after `amount_in` of `from` was added and `amount_out` of `to` removed.
pub fn invariant_after(
    pair: &StablePair,
    from: usize,
    amount_in: Balance,
    to: usize,
    amount_out: Balance,
) -> U512 {
    let mut balances = pair.balances().to_vec();
    balances[from] = balances[from] + amount_in;
    balances[to] = balances[to] - amount_out;
    let mut after = pair.clone();
    after
        .update_balances(balances, pair.lp_supply())
        .unwrap_or_else(|err| panic!("Should update balances. Err: {err:?}"));
    after
        .invariant()
        .unwrap_or_else(|err| panic!("Should compute invariant. Err: {err:?}"))
}

pub fn abs_diff(a: U512, b: U512) -> U512 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Token giving the largest output for `amount` of `from`.
pub fn best_output<P: StablePairView>(
    pair: &P,
    amount: Balance,
    from: &TokenId,
) -> Option<(TokenId, SwapResult)> {
    pair.tokens()
        .into_iter()
        .filter(|to| to != from)
        .filter_map(|to| {
            pair.expected_exchange(amount, from, &to)
                .ok()
                .map(|result| (to, result))
        })
        .max_by_key(|(_, result)| result.amount)
}
