use crate::math::{casted_mul, checked_div_ceil, mul_div, to_u256, MathError};
use primitive_types::{U256, U512};

/// Fees charged on the output side of a swap.
///
/// `pool_numerator / denominator` stays in the pool, `beneficiary_numerator / denominator`
/// is routed to the beneficiary. Both are deducted from what the trader receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeeParams {
    pub denominator: u64,
    pub pool_numerator: u64,
    pub beneficiary_numerator: u64,
}

/// Gross amount split into what the trader gets and the two fee parts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub net: U256,
    pub pool_fee: U256,
    pub beneficiary_fee: U256,
}

impl FeeSplit {
    pub fn total_fee(&self) -> U256 {
        // both parts are carved out of one U256 gross amount
        self.pool_fee.saturating_add(self.beneficiary_fee)
    }
}

impl FeeParams {
    /// Returns `None` if the denominator is zero or the numerators exceed it.
    pub fn new(denominator: u64, pool_numerator: u64, beneficiary_numerator: u64) -> Option<Self> {
        let fees = Self {
            denominator,
            pool_numerator,
            beneficiary_numerator,
        };
        if fees.is_valid() {
            Some(fees)
        } else {
            None
        }
    }

    pub fn zero() -> Self {
        Self {
            denominator: 1,
            pool_numerator: 0,
            beneficiary_numerator: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.denominator > 0
            && (self.pool_numerator as u128 + self.beneficiary_numerator as u128)
                <= self.denominator as u128
    }

    /// `pool_numerator + beneficiary_numerator`
    pub fn total_numerator(&self) -> u128 {
        self.pool_numerator as u128 + self.beneficiary_numerator as u128
    }

    /// True when fees take the whole amount.
    pub fn takes_everything(&self) -> bool {
        self.total_numerator() == self.denominator as u128
    }

    pub fn pool_fee_from_gross(&self, amount: U256) -> Result<U256, MathError> {
        u256_ratio(amount, self.pool_numerator.into(), self.denominator.into(), 66)
    }

    pub fn beneficiary_fee_from_gross(&self, amount: U256) -> Result<U256, MathError> {
        u256_ratio(
            amount,
            self.beneficiary_numerator.into(),
            self.denominator.into(),
            67,
        )
    }

    /// Splits a gross output amount. Each fee part is rounded down independently,
    /// so `net + pool_fee + beneficiary_fee == gross` always holds.
    pub fn apply_fee(&self, gross: U256) -> Result<FeeSplit, MathError> {
        let pool_fee = self.pool_fee_from_gross(gross)?;
        let beneficiary_fee = self.beneficiary_fee_from_gross(gross)?;
        let net = gross
            .checked_sub(pool_fee)
            .ok_or(MathError::SubUnderflow(61))?
            .checked_sub(beneficiary_fee)
            .ok_or(MathError::SubUnderflow(62))?;
        Ok(FeeSplit {
            net,
            pool_fee,
            beneficiary_fee,
        })
    }

    /// Gross amount that leaves at least `net` after fees, rounded up.
    /// Fails with `DivByZero` when fees take everything.
    pub fn gross_from_net(&self, net: U256) -> Result<U256, MathError> {
        let remaining = U256::from(self.denominator)
            .checked_sub(U256::from(self.total_numerator()))
            .ok_or(MathError::SubUnderflow(63))?;
        let gross = checked_div_ceil(
            casted_mul(net, self.denominator.into()),
            U512::from(remaining),
            64,
        )?;
        to_u256(gross, 65)
    }
}

fn u256_ratio(amount: U256, num: U256, denom: U256, code: u8) -> Result<U256, MathError> {
    let ratio = mul_div(amount.into(), num.into(), denom.into(), code)?;
    to_u256(ratio, code)
}
