/*
[INPUT]:  Human-entered token amounts ("1.50") and raw smallest-unit integers
[OUTPUT]: TokenAmount values with exact unit encoding and display formatting
[POS]:    Data layer - bounty and balance arithmetic
[UPDATE]: When token scale or input rules change
*/

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::http::{LedgerError, Result};

/// Decimals of the settlement stablecoin
pub const TOKEN_DECIMALS: u32 = 6;

/// Amount of the settlement token in smallest units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(pub u128);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(0);

    pub fn from_units(units: u128) -> Self {
        Self(units)
    }

    pub fn units(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a human amount, truncating toward zero at `decimals` fractional digits.
    ///
    /// Zero, negative and unparsable inputs are rejected.
    pub fn parse(input: &str, decimals: u32) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidInput("amount is empty".to_string()));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|e| LedgerError::InvalidInput(format!("invalid amount {trimmed:?}: {e}")))?;
        if value.is_sign_negative() {
            return Err(LedgerError::InvalidInput(format!(
                "amount must be positive: {trimmed}"
            )));
        }

        let scale = 10u64
            .checked_pow(decimals)
            .map(Decimal::from)
            .ok_or_else(|| LedgerError::InvalidInput(format!("unsupported token decimals: {decimals}")))?;
        let units = value
            .round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
            .checked_mul(scale)
            .and_then(|scaled| scaled.to_u128())
            .ok_or_else(|| LedgerError::InvalidInput(format!("amount out of range: {trimmed}")))?;

        if units == 0 {
            return Err(LedgerError::InvalidInput(format!(
                "amount must be at least one unit: {trimmed}"
            )));
        }
        Ok(Self(units))
    }

    /// Exact decimal value at the given scale
    pub fn to_decimal(self, decimals: u32) -> Option<Decimal> {
        let units = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(units, decimals).ok()
    }

    /// Two-decimal display, e.g. `1.50`
    pub fn display(self, decimals: u32) -> String {
        match self.to_decimal(decimals) {
            Some(value) => format!("{:.2}", value),
            None => format!("{} units", self.0),
        }
    }

    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    pub fn checked_sub(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_sub(other.0).map(TokenAmount)
    }

    pub fn checked_add(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_add(other.0).map(TokenAmount)
    }
}

impl TryFrom<U256> for TokenAmount {
    type Error = LedgerError;

    fn try_from(value: U256) -> std::result::Result<Self, Self::Error> {
        u128::try_from(value)
            .map(TokenAmount)
            .map_err(|_| LedgerError::Decode(format!("token amount overflows u128: {value}")))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(TOKEN_DECIMALS))
    }
}
