pub mod stable_pair {
    /// Max number of iterations for curve computation using Newton–Raphson method.
    pub const MAX_ITERATIONS: u16 = 255;
    /// Two consecutive Newton approximations closer than this are considered converged.
    pub const CONVERGENCE_TOLERANCE: u64 = 1;

    /// Min number of tokens in a pool.
    pub const MIN_TOKENS: usize = 2;
    /// Max number of tokens in a pool.
    pub const MAX_TOKENS: usize = 8;

    // Token amounts are rescaled as if they had as many decimal places as the
    // most precise token of the pool. 10^36 * u256::MAX still fits in U512.
    pub const MAX_TOKEN_DECIMALS: u8 = 36;

    /// Max decimal places of the amplification coefficient (A = value / 10^precision).
    pub const MAX_AMP_PRECISION: u8 = 18;
}
