//! Network configuration for the Klaytn SDK.
//!
//! This module provides presets for the Klaytn networks (Cypress, Baobab)
//! and custom chains, together with the keystore encryption settings used
//! when exporting keyrings.

use crate::error::{KlaytnError, KlaytnResult};
use crate::keystore::EncryptOptions;
use crate::types::{ChainId, IntoChainId};
use std::fmt;
use std::str::FromStr;

/// Known Klaytn networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Klaytn mainnet
    Cypress,
    /// Klaytn testnet
    Baobab,
    /// Custom network (local or private chain)
    Custom(ChainId),
}

impl Network {
    /// Returns the chain ID for this network.
    pub fn chain_id(&self) -> ChainId {
        match self {
            Network::Cypress => ChainId::cypress(),
            Network::Baobab => ChainId::baobab(),
            Network::Custom(chain_id) => *chain_id,
        }
    }

    /// Returns the network name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Cypress => "cypress",
            Network::Baobab => "baobab",
            Network::Custom(_) => "custom",
        }
    }

    /// Returns the known network for a chain id, or a custom one.
    pub fn from_chain_id(chain_id: ChainId) -> Self {
        if chain_id == ChainId::cypress() {
            Network::Cypress
        } else if chain_id == ChainId::baobab() {
            Network::Baobab
        } else {
            Network::Custom(chain_id)
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Custom(chain_id) => write!(f, "custom({chain_id})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl FromStr for Network {
    type Err = KlaytnError;

    /// Parses a network name (`"cypress"`, `"mainnet"`, `"baobab"`,
    /// `"testnet"`) or a numeric chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cypress" | "mainnet" => Ok(Network::Cypress),
            "baobab" | "testnet" => Ok(Network::Baobab),
            _ => ChainId::parse(s).map(Network::from_chain_id),
        }
    }
}

impl IntoChainId for Network {
    fn into_chain_id(self) -> KlaytnResult<ChainId> {
        Ok(self.chain_id())
    }
}

/// Configuration for signing and keystore export on one network.
///
/// # Example
///
/// ```rust
/// use klaytn_rust_sdk::config::KlaytnConfig;
/// use klaytn_rust_sdk::keystore::EncryptOptions;
///
/// let config = KlaytnConfig::baobab().with_encrypt_options(EncryptOptions::light());
/// assert_eq!(config.chain_id().id(), 1001);
/// ```
#[derive(Debug, Clone)]
pub struct KlaytnConfig {
    pub(crate) network: Network,
    pub(crate) encrypt_options: EncryptOptions,
}

impl Default for KlaytnConfig {
    fn default() -> Self {
        Self::baobab()
    }
}

impl KlaytnConfig {
    /// Creates a configuration for Klaytn mainnet.
    ///
    /// Keystores are encrypted with the standard scrypt cost.
    pub fn cypress() -> Self {
        Self {
            network: Network::Cypress,
            encrypt_options: EncryptOptions::standard(),
        }
    }

    /// Creates a configuration for Klaytn testnet.
    pub fn baobab() -> Self {
        Self {
            network: Network::Baobab,
            encrypt_options: EncryptOptions::default(),
        }
    }

    /// Creates a configuration for a custom chain.
    pub fn custom(chain_id: impl IntoChainId) -> KlaytnResult<Self> {
        Ok(Self {
            network: Network::from_chain_id(chain_id.into_chain_id()?),
            encrypt_options: EncryptOptions::default(),
        })
    }

    /// Sets the keystore encryption options.
    #[must_use]
    pub fn with_encrypt_options(mut self, options: EncryptOptions) -> Self {
        self.encrypt_options = options;
        self
    }

    /// Returns the network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the chain id that transaction signatures bind to.
    pub fn chain_id(&self) -> ChainId {
        self.network.chain_id()
    }

    /// Returns the keystore encryption options.
    pub fn encrypt_options(&self) -> &EncryptOptions {
        &self.encrypt_options
    }
}
