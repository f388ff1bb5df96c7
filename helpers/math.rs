use primitive_types::{U256, U512};

/// Arithmetic failure. The code identifies the operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("addition overflow (#{0})")]
    AddOverflow(u8),
    #[error("cast overflow (#{0})")]
    CastOverflow(u8),
    #[error("division by zero (#{0})")]
    DivByZero(u8),
    #[error("multiplication overflow (#{0})")]
    MulOverflow(u8),
    #[error("subtraction underflow (#{0})")]
    SubUnderflow(u8),
}

/// Multiplies two 256-bit values into a 512-bit product. Never overflows.
pub fn casted_mul(a: U256, b: U256) -> U512 {
    a.full_mul(b)
}

/// Computes `a * b / c` rounding down.
pub fn mul_div(a: U512, b: U512, c: U512, code: u8) -> Result<U512, MathError> {
    a.checked_mul(b)
        .ok_or(MathError::MulOverflow(code))?
        .checked_div(c)
        .ok_or(MathError::DivByZero(code))
}

/// Computes `a / b` rounding up.
pub fn checked_div_ceil(a: U512, b: U512, code: u8) -> Result<U512, MathError> {
    if b.is_zero() {
        return Err(MathError::DivByZero(code));
    }
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U512::one())
            .ok_or(MathError::AddOverflow(code))
    }
}

/// Narrows a 512-bit value back to a 256-bit amount.
pub fn to_u256(value: U512, code: u8) -> Result<U256, MathError> {
    U256::try_from(value).map_err(|_| MathError::CastOverflow(code))
}

/// `|a - b|`
pub fn abs_diff(a: U512, b: U512) -> U512 {
    if a > b {
        a - b
    } else {
        b - a
    }
}
