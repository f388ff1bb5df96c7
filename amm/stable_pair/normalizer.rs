use primitive_types::U512;
use traits::{Balance, MathError};

use amm_helpers::math::{checked_div_ceil, to_u256};

/// Rescales raw token amounts to the precision of the most precise token in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    target_decimals: u8,
}

impl Normalizer {
    pub fn new(decimals: &[u8]) -> Self {
        Self {
            target_decimals: decimals.iter().copied().max().unwrap_or(0),
        }
    }

    pub fn target_decimals(&self) -> u8 {
        self.target_decimals
    }

    /// `10^(target_decimals - decimals)`
    fn precision_mul(&self, decimals: u8) -> Result<U512, MathError> {
        let exp = self
            .target_decimals
            .checked_sub(decimals)
            .ok_or(MathError::SubUnderflow(81))?;
        Ok(U512::exp10(exp as usize))
    }

    /// Scales up, exact.
    pub fn to_common(&self, raw_amount: Balance, decimals: u8) -> Result<U512, MathError> {
        U512::from(raw_amount)
            .checked_mul(self.precision_mul(decimals)?)
            .ok_or(MathError::MulOverflow(81))
    }

    /// Scales down, dropping the remainder.
    pub fn from_common(&self, amount: U512, decimals: u8) -> Result<Balance, MathError> {
        let raw = amount
            .checked_div(self.precision_mul(decimals)?)
            .ok_or(MathError::DivByZero(81))?;
        to_u256(raw, 81)
    }

    /// Scales down, rounding any remainder up. Used for amounts the trader pays.
    pub fn from_common_ceil(&self, amount: U512, decimals: u8) -> Result<Balance, MathError> {
        let raw = checked_div_ceil(amount, self.precision_mul(decimals)?, 82)?;
        to_u256(raw, 82)
    }

    pub fn to_common_all(
        &self,
        raw_amounts: &[Balance],
        decimals: &[u8],
    ) -> Result<Vec<U512>, MathError> {
        raw_amounts
            .iter()
            .zip(decimals.iter())
            .map(|(&amount, &decimals)| self.to_common(amount, decimals))
            .collect()
    }
}
