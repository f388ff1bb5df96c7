mod normalizer;
mod token_registry;

use primitive_types::U512;
use tracing::{debug, trace};

use amm_helpers::{ensure, stable_swap_math as math};

pub use amm_helpers::stable_swap_math::{
    amp_coef::AmplificationCoefficient, fees::FeeParams, SolverConfig,
};
pub use normalizer::Normalizer;
pub use token_registry::{TokenDataInput, TokenRegistry};
pub use traits::{
    Balance, MathError, OneAmountSwapResult, StablePairError, StablePairView, SwapResult, TokenId,
};

/// Stable swap pricing engine of a single pool.
///
/// Quotes are read-only. Balances and LP supply change only through
/// [`StablePair::update_balances`], which needs exclusive access.
#[derive(Debug, Clone)]
pub struct StablePair {
    registry: TokenRegistry,
    normalizer: Normalizer,
    amp_coef: AmplificationCoefficient,
    fees: FeeParams,
    lp_supply: Balance,
    solver: SolverConfig,
}

impl StablePair {
    /// Builds a pair from per-slot token data and a token id to slot mapping.
    ///
    /// `token_index` must map every token to a distinct slot in `0..token_data.len()`.
    pub fn new<I>(
        token_data: Vec<TokenDataInput>,
        token_index: I,
        amp_coef: AmplificationCoefficient,
        fees: FeeParams,
        lp_supply: Balance,
    ) -> Result<Self, StablePairError>
    where
        I: IntoIterator<Item = (TokenId, u8)>,
    {
        ensure!(amp_coef.is_valid(), StablePairError::InvalidAmpCoef);
        ensure!(fees.is_valid(), StablePairError::InvalidFeeParams);
        let registry = TokenRegistry::new(token_data, token_index)?;
        let normalizer = Normalizer::new(registry.all_decimals());
        debug!(
            tokens = registry.len(),
            common_decimals = normalizer.target_decimals(),
            amp = amp_coef.value,
            amp_precision = amp_coef.precision,
            "stable pair created"
        );
        Ok(Self {
            registry,
            normalizer,
            amp_coef,
            fees,
            lp_supply,
            solver: SolverConfig::default(),
        })
    }

    /// Builds a pair whose slot order is the order of `token_ids`.
    pub fn with_default_index(
        token_ids: &[TokenId],
        token_data: Vec<TokenDataInput>,
        amp_coef: AmplificationCoefficient,
        fees: FeeParams,
        lp_supply: Balance,
    ) -> Result<Self, StablePairError> {
        ensure!(
            token_ids.len() == token_data.len(),
            StablePairError::InvalidIndexMapping {
                expected: token_data.len(),
            }
        );
        Self::new(
            token_data,
            token_ids.iter().copied().zip(0u8..),
            amp_coef,
            fees,
            lp_supply,
        )
    }

    /// Replaces the Newton iteration limits.
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn tokens(&self) -> &[TokenId] {
        self.registry.tokens()
    }

    pub fn balances(&self) -> &[Balance] {
        self.registry.balances()
    }

    pub fn decimals(&self) -> &[u8] {
        self.registry.all_decimals()
    }

    pub fn lp_supply(&self) -> Balance {
        self.lp_supply
    }

    pub fn amp_coef(&self) -> AmplificationCoefficient {
        self.amp_coef
    }

    pub fn fee_params(&self) -> FeeParams {
        self.fees
    }

    pub fn solver_config(&self) -> SolverConfig {
        self.solver
    }

    /// Current invariant D, in common precision.
    pub fn invariant(&self) -> Result<U512, StablePairError> {
        let reserves = self.normalized_reserves()?;
        Ok(math::compute_d(&reserves, &self.amp_coef, &self.solver)?)
    }

    /// Checks if tokens are valid and returns their slots.
    fn check_tokens(
        &self,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<(usize, usize), StablePairError> {
        ensure!(from != to, StablePairError::SameToken);
        Ok((self.registry.resolve(from)?, self.registry.resolve(to)?))
    }

    fn ensure_nonzero_balances(&self) -> Result<(), StablePairError> {
        match self.registry.zero_balance_slot() {
            Some(slot) => Err(StablePairError::ZeroBalance(slot)),
            None => Ok(()),
        }
    }

    fn normalized_reserves(&self) -> Result<Vec<U512>, MathError> {
        self.normalizer
            .to_common_all(self.registry.balances(), self.registry.all_decimals())
    }

    /// Amount of `to` received for `amount` of `from`. The fee is taken from the output.
    pub fn expected_exchange(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError> {
        let (from_idx, to_idx) = self.check_tokens(from, to)?;
        self.ensure_nonzero_balances()?;
        if amount.is_zero() {
            return Ok(SwapResult::zero());
        }

        let reserves = self.normalized_reserves()?;
        let amount_in = self
            .normalizer
            .to_common(amount, self.registry.decimals(from_idx))?;
        let gross_common = math::swap_to(
            from_idx,
            amount_in,
            to_idx,
            &reserves,
            &self.amp_coef,
            &self.solver,
        )?;
        let gross = self
            .normalizer
            .from_common(gross_common, self.registry.decimals(to_idx))?;
        ensure!(
            gross < self.registry.balance(to_idx),
            StablePairError::InsufficientLiquidity
        );

        let split = self.fees.apply_fee(gross)?;
        trace!(
            %amount,
            from = from_idx,
            to = to_idx,
            %gross,
            net = %split.net,
            "exchange quoted"
        );
        Ok(SwapResult {
            amount: split.net,
            pool_fee: split.pool_fee,
            beneficiary_fee: split.beneficiary_fee,
        })
    }

    /// Amount of `from` required to receive `amount` of `to` after fees.
    /// The input is rounded up and the fee is reported in `to` units.
    pub fn expected_spend_amount(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError> {
        let (from_idx, to_idx) = self.check_tokens(from, to)?;
        ensure!(
            amount.is_zero() || !self.fees.takes_everything(),
            StablePairError::FeeExceedsAmount
        );
        self.ensure_nonzero_balances()?;
        if amount.is_zero() {
            return Ok(SwapResult::zero());
        }

        let gross = self.fees.gross_from_net(amount)?;
        ensure!(
            gross < self.registry.balance(to_idx),
            StablePairError::InsufficientLiquidity
        );
        let split = self.fees.apply_fee(gross)?;

        let reserves = self.normalized_reserves()?;
        let gross_common = self
            .normalizer
            .to_common(gross, self.registry.decimals(to_idx))?;
        let amount_in_common = math::swap_from(
            to_idx,
            gross_common,
            from_idx,
            &reserves,
            &self.amp_coef,
            &self.solver,
        )?;
        let amount_in = self
            .normalizer
            .from_common_ceil(amount_in_common, self.registry.decimals(from_idx))?;
        trace!(
            %amount,
            from = from_idx,
            to = to_idx,
            %gross,
            %amount_in,
            "spend amount quoted"
        );
        Ok(SwapResult {
            amount: amount_in,
            pool_fee: split.pool_fee,
            beneficiary_fee: split.beneficiary_fee,
        })
    }

    /// Quotes the exchange of one whole `from` token.
    /// The result is denominated in `to` decimals.
    pub fn expected_exchange_one_amount(
        &self,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<OneAmountSwapResult, StablePairError> {
        let (from_idx, to_idx) = self.check_tokens(from, to)?;
        let one = Balance::exp10(self.registry.decimals(from_idx) as usize);
        Ok(OneAmountSwapResult {
            result: self.expected_exchange(one, from, to)?,
            decimals: self.registry.decimals(to_idx),
        })
    }

    /// Quotes the input needed for one whole `to` token.
    /// The result is denominated in `from` decimals.
    pub fn expected_spend_amount_one_amount(
        &self,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<OneAmountSwapResult, StablePairError> {
        let (from_idx, to_idx) = self.check_tokens(from, to)?;
        let one = Balance::exp10(self.registry.decimals(to_idx) as usize);
        Ok(OneAmountSwapResult {
            result: self.expected_spend_amount(one, from, to)?,
            decimals: self.registry.decimals(from_idx),
        })
    }

    /// Overwrites all balances and the LP supply. On error nothing is changed.
    pub fn update_balances(
        &mut self,
        balances: Vec<Balance>,
        lp_supply: Balance,
    ) -> Result<(), StablePairError> {
        self.registry.replace_balances(balances)?;
        self.lp_supply = lp_supply;
        debug!(balances = ?self.registry.balances(), %lp_supply, "balances updated");
        Ok(())
    }
}

impl StablePairView for StablePair {
    fn tokens(&self) -> Vec<TokenId> {
        self.registry.tokens().to_vec()
    }

    fn balances(&self) -> Vec<Balance> {
        self.registry.balances().to_vec()
    }

    fn lp_supply(&self) -> Balance {
        self.lp_supply
    }

    fn expected_exchange(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError> {
        StablePair::expected_exchange(self, amount, from, to)
    }

    fn expected_spend_amount(
        &self,
        amount: Balance,
        from: &TokenId,
        to: &TokenId,
    ) -> Result<SwapResult, StablePairError> {
        StablePair::expected_spend_amount(self, amount, from, to)
    }
}
