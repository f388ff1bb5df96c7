use primitive_types::U512;

use crate::constants::stable_pair::MAX_AMP_PRECISION;

/// Amplification coefficient `A = value / 10^precision`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmplificationCoefficient {
    pub value: u64,
    pub precision: u8,
}

impl AmplificationCoefficient {
    /// Returns `None` if `precision` exceeds [`MAX_AMP_PRECISION`].
    pub fn new(value: u64, precision: u8) -> Option<Self> {
        if precision > MAX_AMP_PRECISION {
            None
        } else {
            Some(Self { value, precision })
        }
    }

    /// Whole-number coefficient, `precision == 0`.
    pub fn integer(value: u64) -> Self {
        Self {
            value,
            precision: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.precision <= MAX_AMP_PRECISION
    }

    /// `10^precision`
    pub fn precision_factor(&self) -> U512 {
        U512::exp10(self.precision as usize)
    }

    /// `A * n^n`, scaled by `10^precision`.
    pub fn scaled_ann(&self, n_pow_n: u32) -> U512 {
        U512::from(self.value) * U512::from(n_pow_n)
    }
}
