use std::collections::HashMap;

use amm_helpers::{
    constants::stable_pair::{MAX_TOKENS, MAX_TOKEN_DECIMALS, MIN_TOKENS},
    ensure,
};
use traits::{Balance, StablePairError, TokenId};

/// On-chain snapshot of one pool token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TokenDataInput {
    pub decimals: u8,
    pub balance: Balance,
}

impl TokenDataInput {
    pub fn new(decimals: u8, balance: impl Into<Balance>) -> Self {
        Self {
            decimals,
            balance: balance.into(),
        }
    }
}

/// Tokens of a pool, addressed by dense slots `0..n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRegistry {
    /// Token ids by slot.
    tokens: Vec<TokenId>,
    /// Slot by token id.
    index: HashMap<TokenId, usize>,
    /// Token decimals by slot.
    decimals: Vec<u8>,
    /// Raw balances by slot.
    balances: Vec<Balance>,
}

impl TokenRegistry {
    pub fn new<I>(token_data: Vec<TokenDataInput>, token_index: I) -> Result<Self, StablePairError>
    where
        I: IntoIterator<Item = (TokenId, u8)>,
    {
        let token_count = token_data.len();
        ensure!(
            (MIN_TOKENS..=MAX_TOKENS).contains(&token_count),
            StablePairError::IncorrectTokenCount(token_count)
        );
        if let Some(slot) = token_data
            .iter()
            .position(|token| token.decimals > MAX_TOKEN_DECIMALS)
        {
            return Err(StablePairError::TooLargeTokenDecimal(slot));
        }

        let invalid_mapping = StablePairError::InvalidIndexMapping {
            expected: token_count,
        };
        let mut tokens: Vec<Option<TokenId>> = vec![None; token_count];
        let mut index = HashMap::with_capacity(token_count);
        for (token, slot) in token_index {
            let slot = slot as usize;
            ensure!(
                !index.contains_key(&token),
                StablePairError::DuplicateToken(token)
            );
            ensure!(slot < token_count, invalid_mapping.clone());
            ensure!(tokens[slot].is_none(), invalid_mapping.clone());
            tokens[slot] = Some(token);
            index.insert(token, slot);
        }
        let tokens = tokens
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(invalid_mapping)?;

        let (decimals, balances) = token_data
            .into_iter()
            .map(|token| (token.decimals, token.balance))
            .unzip();
        Ok(Self {
            tokens,
            index,
            decimals,
            balances,
        })
    }

    pub fn resolve(&self, token: &TokenId) -> Result<usize, StablePairError> {
        self.index
            .get(token)
            .copied()
            .ok_or(StablePairError::UnknownToken(*token))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Panics if `slot` is out of bounds.
    pub fn decimals(&self, slot: usize) -> u8 {
        self.decimals[slot]
    }

    /// Panics if `slot` is out of bounds.
    pub fn balance(&self, slot: usize) -> Balance {
        self.balances[slot]
    }

    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    pub fn all_decimals(&self) -> &[u8] {
        &self.decimals
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    /// First slot holding a zero balance, if any.
    pub fn zero_balance_slot(&self) -> Option<usize> {
        self.balances.iter().position(|balance| balance.is_zero())
    }

    /// Replaces all balances at once. Nothing changes on error.
    pub fn replace_balances(&mut self, balances: Vec<Balance>) -> Result<(), StablePairError> {
        ensure!(
            balances.len() == self.balances.len(),
            StablePairError::BalanceCountMismatch {
                expected: self.balances.len(),
                actual: balances.len(),
            }
        );
        self.balances = balances;
        Ok(())
    }
}
