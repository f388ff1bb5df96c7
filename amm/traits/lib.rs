mod stable_pair;
mod token_id;

/// Raw token amount, in the token's own decimals.
pub type Balance = primitive_types::U256;

pub use amm_helpers::math::MathError;
pub use stable_pair::{OneAmountSwapResult, StablePairError, StablePairView, SwapResult};
pub use token_id::TokenId;
