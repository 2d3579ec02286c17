//! Chain identifier type.

use crate::error::{KlaytnError, KlaytnResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A network chain identifier, bound into transaction signatures for
/// replay protection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// Creates a chain id from its numeric value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The Cypress mainnet chain id.
    pub const fn cypress() -> Self {
        Self(8217)
    }

    /// The Baobab testnet chain id.
    pub const fn baobab() -> Self {
        Self(1001)
    }

    /// Returns the numeric value.
    pub const fn id(&self) -> u64 {
        self.0
    }

    /// Parses a decimal string (`"1001"`) or a `0x`-prefixed hex string
    /// (`"0x3e9"`).
    pub fn parse(s: &str) -> KlaytnResult<Self> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(Self)
            .map_err(|_| KlaytnError::InvalidChainId(format!("'{s}' is not a non-negative integer")))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = KlaytnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Conversion into a validated [`ChainId`].
///
/// Signing entry points accept anything implementing this trait, so a
/// chain id may be given as a number, a numeric string or a [`ChainId`].
/// Negative numbers and non-numeric strings are rejected with
/// [`KlaytnError::InvalidChainId`].
pub trait IntoChainId {
    /// Converts the value, validating it.
    fn into_chain_id(self) -> KlaytnResult<ChainId>;
}

impl IntoChainId for ChainId {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        Ok(self)
    }
}

impl IntoChainId for u64 {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        Ok(ChainId(self))
    }
}

impl IntoChainId for u32 {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        Ok(ChainId(u64::from(self)))
    }
}

impl IntoChainId for i64 {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        u64::try_from(self)
            .map(ChainId)
            .map_err(|_| KlaytnError::InvalidChainId(format!("{self} is negative")))
    }
}

impl IntoChainId for i32 {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        i64::from(self).into_chain_id()
    }
}

impl IntoChainId for &str {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        ChainId::parse(self)
    }
}

impl IntoChainId for &String {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        ChainId::parse(self)
    }
}

impl IntoChainId for String {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        ChainId::parse(&self)
    }
}
