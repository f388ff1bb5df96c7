use amm_helpers::stable_swap_math::CurveError;

use crate::{Balance, MathError, TokenId};

/// Outcome of a swap quote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Net amount received (`expected_exchange`) or required input (`expected_spend_amount`).
    pub amount: Balance,
    /// Part of the output fee retained by the pool.
    pub pool_fee: Balance,
    /// Part of the output fee routed to the beneficiary.
    pub beneficiary_fee: Balance,
}

impl SwapResult {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Total fee, in units of the output token.
    pub fn fee(&self) -> Balance {
        self.pool_fee.saturating_add(self.beneficiary_fee)
    }
}

/// Quote of exactly one whole token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OneAmountSwapResult {
    pub result: SwapResult,
    /// Decimals of the token `result.amount` is denominated in.
    pub decimals: u8,
}

pub trait StablePairView {
    /// Returns list of tokens in slot order.
    fn tokens(&self) -> Vec<TokenId>;

    /// Returns list of raw token balances in slot order.
    fn balances(&self) -> Vec<Balance>;

    /// Returns total supply of LP tokens.
    fn lp_supply(&self) -> Balance;

    /// Calculate amount of `to` token received for `amount` of `from` token.
    /// Fee is applied to the `to` amount.
    fn expected_exchange(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError>;

    /// Calculate amount of `from` token required to receive `amount` of `to` token.
    /// Fee is applied to the `to` amount.
    fn expected_spend_amount(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StablePairError {
    #[error(transparent)]
    MathError(#[from] MathError),
    #[error("unknown token {0}")]
    UnknownToken(TokenId),
    #[error("token {0} is listed more than once")]
    DuplicateToken(TokenId),
    #[error("token index is not a permutation of 0..{expected}")]
    InvalidIndexMapping { expected: usize },
    #[error("tokens to swap are identical")]
    SameToken,
    #[error("balance of token #{0} is zero")]
    ZeroBalance(usize),
    #[error("invariant did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: u16 },
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    #[error("fees take the whole amount")]
    FeeExceedsAmount,
    #[error("expected {expected} balances, got {actual}")]
    BalanceCountMismatch { expected: usize, actual: usize },
    #[error("incorrect token count: {0}")]
    IncorrectTokenCount(usize),
    #[error("token #{0} has too many decimals")]
    TooLargeTokenDecimal(usize),
    #[error("invalid amplification coefficient")]
    InvalidAmpCoef,
    #[error("invalid fee params")]
    InvalidFeeParams,
    #[error("invalid token id: {0:?}")]
    InvalidTokenId(String),
}

impl From<CurveError> for StablePairError {
    fn from(error: CurveError) -> Self {
        match error {
            CurveError::ZeroBalance(idx) => StablePairError::ZeroBalance(idx),
            CurveError::ConvergenceFailure { iterations } => {
                StablePairError::ConvergenceFailure { iterations }
            }
            CurveError::ReserveDrained(_) => StablePairError::InsufficientLiquidity,
            CurveError::Math(error) => StablePairError::MathError(error),
        }
    }
}
