pub mod amp_coef;
pub mod fees;

use crate::constants::stable_pair::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS};
use crate::math::{abs_diff, MathError};
use primitive_types::U512;

use amp_coef::AmplificationCoefficient;

/// Failure of the invariant solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    #[error("balance of token #{0} is zero")]
    ZeroBalance(usize),
    #[error("no convergence after {iterations} iterations")]
    ConvergenceFailure { iterations: u16 },
    #[error("reserve of token #{0} would be drained")]
    ReserveDrained(usize),
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Newton–Raphson stop conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub max_iterations: u16,
    pub tolerance: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}

fn ensure_nonzero<'a, I>(amounts: I) -> Result<(), CurveError>
where
    I: IntoIterator<Item = (usize, &'a U512)>,
{
    for (idx, amount) in amounts {
        if amount.is_zero() {
            return Err(CurveError::ZeroBalance(idx));
        }
    }
    Ok(())
}

fn n_pow_n(n: u32) -> Result<u32, MathError> {
    n.checked_pow(n).ok_or(MathError::MulOverflow(1))
}

/// Computes stable swap invariant (D) of normalized `amounts`.
///
/// All amounts must be nonzero.
pub fn compute_d(
    amounts: &[U512],
    amp_coef: &AmplificationCoefficient,
    config: &SolverConfig,
) -> Result<U512, CurveError> {
    ensure_nonzero(amounts.iter().enumerate())?;
    // SUM{x_i}
    let amount_sum = amounts.iter().try_fold(U512::zero(), |acc, &amount| {
        acc.checked_add(amount).ok_or(MathError::AddOverflow(1))
    })?;
    let n = amounts.len() as u32;
    // A * n^n * 10^p
    let ann = amp_coef.scaled_ann(n_pow_n(n)?);
    let precision = amp_coef.precision_factor();
    // A * n^n * SUM{x_i} * 10^p
    let ann_sum = ann
        .checked_mul(amount_sum)
        .ok_or(MathError::MulOverflow(2))?;
    let tolerance = U512::from(config.tolerance);
    let mut d = amount_sum;
    for _ in 0..config.max_iterations {
        let d_next = compute_d_next(d, n, amounts, ann, ann_sum, precision)?;
        let converged = abs_diff(d_next, d) <= tolerance;
        d = d_next;
        if converged {
            return Ok(d);
        }
    }
    tracing::warn!(
        iterations = config.max_iterations,
        %d,
        "invariant computation did not converge"
    );
    Err(CurveError::ConvergenceFailure {
        iterations: config.max_iterations,
    })
}

//                 (Ann * S + n * D_p) * D
//   D_next = -----------------------------------
//             (Ann - 1) * D + (n + 1) * D_p
//
// with both sides multiplied by 10^p so that fractional A stays exact and
// Ann - 1 never goes negative for A < 1.
fn compute_d_next(
    d_prev: U512,
    n: u32,
    amounts: &[U512],
    ann: U512,
    ann_sum: U512,
    precision: U512,
) -> Result<U512, MathError> {
    let n_u512 = U512::from(n);
    let mut d_prod = d_prev;
    // d_prod = ... * [d_prev / (x_(i) * n)] * ...
    // where i in (0,n)
    for amount in amounts {
        d_prod = d_prod
            .checked_mul(d_prev)
            .ok_or(MathError::MulOverflow(3))?
            .checked_div(
                amount
                    .checked_mul(n_u512)
                    .ok_or(MathError::MulOverflow(4))?,
            )
            .ok_or(MathError::DivByZero(1))?;
    }
    // d_prod * 10^p
    let d_prod_scaled = d_prod
        .checked_mul(precision)
        .ok_or(MathError::MulOverflow(5))?;
    let numerator = d_prev
        .checked_mul(
            d_prod_scaled
                .checked_mul(n_u512)
                .ok_or(MathError::MulOverflow(6))?
                .checked_add(ann_sum)
                .ok_or(MathError::AddOverflow(2))?,
        )
        .ok_or(MathError::MulOverflow(7))?;
    let denominator = d_prev
        .checked_mul(ann)
        .ok_or(MathError::MulOverflow(8))?
        .checked_add(
            d_prod_scaled
                .checked_mul(U512::from(n + 1))
                .ok_or(MathError::MulOverflow(9))?,
        )
        .ok_or(MathError::AddOverflow(3))?
        .checked_sub(
            d_prev
                .checked_mul(precision)
                .ok_or(MathError::MulOverflow(10))?,
        )
        .ok_or(MathError::SubUnderflow(1))?;
    numerator
        .checked_div(denominator)
        .ok_or(MathError::DivByZero(2))
}

/// Returns the balance of `token_y_id` that keeps invariant `d`
/// given all the other `reserves`. `reserves[token_y_id]` is ignored.
///
/// NOTICE: it does not check if `token_y_id` is out of bounds.
pub fn solve_for_balance(
    d: U512,
    reserves: &[U512],
    token_y_id: usize,
    amp_coef: &AmplificationCoefficient,
    config: &SolverConfig,
) -> Result<U512, CurveError> {
    ensure_nonzero(
        reserves
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != token_y_id),
    )?;
    let n = reserves.len() as u32;
    let n_u512 = U512::from(n);
    let ann = amp_coef.scaled_ann(n_pow_n(n)?);
    let precision = amp_coef.precision_factor();

    let mut c = d;
    let mut reserves_sum = U512::zero();
    // reserves_sum = ... + x_(i') + ...
    // c = ... * d / (x_(i') * n) * ...
    // where i' in (0,n) AND i' != token_y_id
    for (idx, &reserve) in reserves.iter().enumerate() {
        if idx != token_y_id {
            reserves_sum = reserves_sum
                .checked_add(reserve)
                .ok_or(MathError::AddOverflow(4))?;
            c = c
                .checked_mul(d)
                .ok_or(MathError::MulOverflow(11))?
                .checked_div(
                    reserve
                        .checked_mul(n_u512)
                        .ok_or(MathError::MulOverflow(12))?,
                )
                .ok_or(MathError::DivByZero(3))?;
        }
    }
    // c = D^(n+1) / (n^n * PROD{x_i'}) * 10^p
    c = c
        .checked_mul(d)
        .ok_or(MathError::MulOverflow(13))?
        .checked_div(n_u512)
        .ok_or(MathError::DivByZero(4))?
        .checked_mul(precision)
        .ok_or(MathError::MulOverflow(14))?;
    // b = Ann * reserves_sum + D, scaled by 10^p (D will be subtracted later)
    let b = ann
        .checked_mul(reserves_sum)
        .ok_or(MathError::MulOverflow(15))?
        .checked_add(
            d.checked_mul(precision)
                .ok_or(MathError::MulOverflow(16))?,
        )
        .ok_or(MathError::AddOverflow(5))?;
    // Ann * D, scaled by 10^p
    let ann_d = ann.checked_mul(d).ok_or(MathError::MulOverflow(17))?;

    let tolerance = U512::from(config.tolerance);
    let mut y = d;
    for _ in 0..config.max_iterations {
        let y_next = compute_y_next(y, ann, b, c, ann_d)?;
        let converged = abs_diff(y_next, y) <= tolerance;
        y = y_next;
        if converged {
            return Ok(y);
        }
    }
    tracing::warn!(
        iterations = config.max_iterations,
        %y,
        token = token_y_id,
        "balance computation did not converge"
    );
    Err(CurveError::ConvergenceFailure {
        iterations: config.max_iterations,
    })
}

//                  Ann * y^2 + c
//   y_next = ------------------------
//             2 * Ann * y + b - Ann * D
//
// Newton step on Ann * y^2 + (Ann * (S' - D) + D) * y - D^(n+1) / (n^n * PROD') = 0,
// which stays well defined for A = 0.
fn compute_y_next(y_prev: U512, ann: U512, b: U512, c: U512, ann_d: U512) -> Result<U512, MathError> {
    let ann_y = ann.checked_mul(y_prev).ok_or(MathError::MulOverflow(18))?;
    let numerator = ann_y
        .checked_mul(y_prev)
        .ok_or(MathError::MulOverflow(19))?
        .checked_add(c)
        .ok_or(MathError::AddOverflow(6))?;
    let denominator = ann_y
        .checked_mul(2.into())
        .ok_or(MathError::MulOverflow(20))?
        .checked_add(b)
        .ok_or(MathError::AddOverflow(7))?
        .checked_sub(ann_d)
        .ok_or(MathError::SubUnderflow(2))?;
    numerator
        .checked_div(denominator)
        .ok_or(MathError::DivByZero(5))
}

/// Returns new reserve of `y` tokens given new reserve of `x` tokens.
/// The invariant is computed from the current `reserves`.
///
/// NOTICE: it does not check if `token_x_id` != `token_y_id` and if tokens' `id`s are out of bounds
pub fn compute_y(
    new_reserve_x: U512,
    reserves: &[U512],
    token_x_id: usize,
    token_y_id: usize,
    amp_coef: &AmplificationCoefficient,
    config: &SolverConfig,
) -> Result<U512, CurveError> {
    let d = compute_d(reserves, amp_coef, config)?;
    let mut new_reserves = reserves.to_vec();
    new_reserves[token_x_id] = new_reserve_x;
    solve_for_balance(d, &new_reserves, token_y_id, amp_coef, config)
}

/// Compute gross (before fee) amount of `token_out_idx` received after
/// adding `token_in_amount` to `token_in_idx`. All amounts are normalized.
///
/// NOTICE: it does not check if `token_in_idx` != `token_out_idx`.
pub fn swap_to(
    token_in_idx: usize,
    token_in_amount: U512,
    token_out_idx: usize,
    current_reserves: &[U512],
    amp_coef: &AmplificationCoefficient,
    config: &SolverConfig,
) -> Result<U512, CurveError> {
    let y = compute_y(
        token_in_amount
            .checked_add(current_reserves[token_in_idx])
            .ok_or(MathError::AddOverflow(8))?,
        current_reserves,
        token_in_idx,
        token_out_idx,
        amp_coef,
        config,
    )?;
    if y.is_zero() {
        return Err(CurveError::ReserveDrained(token_out_idx));
    }
    // sub 1 in case there are any rounding errors
    // https://github.com/curvefi/curve-contract/blob/b0bbf77f8f93c9c5f4e415bce9cd71f0cdee960e/contracts/pool-templates/base/SwapTemplateBase.vy#L466
    Ok(current_reserves[token_out_idx]
        .saturating_sub(y)
        .saturating_sub(U512::one()))
}

/// Compute amount of `token_in_idx` that has to be added so that
/// `token_out_amount` (gross, fee included) of `token_out_idx` can be taken out.
/// All amounts are normalized.
///
/// NOTICE: it does not check if `token_in_idx` != `token_out_idx`.
/// The caller must make sure `token_out_amount` is less than the reserve.
pub fn swap_from(
    token_out_idx: usize,
    token_out_amount: U512,
    token_in_idx: usize,
    current_reserves: &[U512],
    amp_coef: &AmplificationCoefficient,
    config: &SolverConfig,
) -> Result<U512, CurveError> {
    let y = compute_y(
        current_reserves[token_out_idx]
            .checked_sub(token_out_amount)
            .ok_or(MathError::SubUnderflow(3))?,
        current_reserves,
        token_out_idx,
        token_in_idx,
        amp_coef,
        config,
    )?;
    // add 1 in case there are any rounding errors
    // https://github.com/curvefi/curve-contract/blob/b0bbf77f8f93c9c5f4e415bce9cd71f0cdee960e/contracts/pool-templates/base/SwapTemplateBase.vy#L466
    y.saturating_sub(current_reserves[token_in_idx])
        .checked_add(U512::one())
        .ok_or(CurveError::Math(MathError::AddOverflow(9)))
}
