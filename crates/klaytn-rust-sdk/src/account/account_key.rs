//! On-chain account key descriptors.

use crate::account::WeightedMultiSigOptions;
use crate::crypto::PublicKey;
use crate::error::{KlaytnError, KlaytnResult};
use serde::{Deserialize, Serialize};

/// The maximum number of keys in a weighted multisig account key.
pub const MAX_ACCOUNT_KEY_NUMBER: usize = 10;

/// A public key together with its voting weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedPublicKey {
    weight: u32,
    public_key: PublicKey,
}

impl WeightedPublicKey {
    /// Creates a weighted public key.
    pub fn new(weight: u32, public_key: PublicKey) -> Self {
        Self { weight, public_key }
    }

    /// Returns the weight.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

/// A weighted multisig account key: a transaction is valid once the weights
/// of its signers sum to at least `threshold`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKeyWeightedMultiSig {
    threshold: u32,
    weighted_public_keys: Vec<WeightedPublicKey>,
}

impl AccountKeyWeightedMultiSig {
    /// Builds a weighted multisig key from public keys and complete options.
    ///
    /// Fails with [`KlaytnError::InvalidWeightedMultiSigOptions`] unless the
    /// threshold and weights are set, the threshold is positive, there is one
    /// weight per key, there are between 1 and [`MAX_ACCOUNT_KEY_NUMBER`]
    /// keys, and the weights sum to at least the threshold.
    pub fn from_public_keys_and_options(
        public_keys: &[PublicKey],
        options: &WeightedMultiSigOptions,
    ) -> KlaytnResult<Self> {
        let (Some(threshold), Some(weights)) = (options.threshold(), options.weights()) else {
            return Err(KlaytnError::InvalidWeightedMultiSigOptions(
                "threshold and weights must both be defined".to_string(),
            ));
        };
        if threshold == 0 {
            return Err(KlaytnError::InvalidWeightedMultiSigOptions(
                "threshold must be greater than 0".to_string(),
            ));
        }
        if public_keys.is_empty() || public_keys.len() > MAX_ACCOUNT_KEY_NUMBER {
            return Err(KlaytnError::InvalidWeightedMultiSigOptions(format!(
                "the number of keys must be between 1 and {MAX_ACCOUNT_KEY_NUMBER}, got {}",
                public_keys.len()
            )));
        }
        if weights.len() != public_keys.len() {
            return Err(KlaytnError::InvalidWeightedMultiSigOptions(format!(
                "the number of weights ({}) must equal the number of keys ({})",
                weights.len(),
                public_keys.len()
            )));
        }
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total < u64::from(threshold) {
            return Err(KlaytnError::InvalidWeightedMultiSigOptions(format!(
                "the sum of weights ({total}) is less than the threshold ({threshold})"
            )));
        }

        Ok(Self {
            threshold,
            weighted_public_keys: public_keys
                .iter()
                .zip(weights)
                .map(|(public_key, &weight)| WeightedPublicKey::new(weight, *public_key))
                .collect(),
        })
    }

    /// Returns the threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the weighted public keys in key order.
    pub fn weighted_public_keys(&self) -> &[WeightedPublicKey] {
        &self.weighted_public_keys
    }
}

/// The kinds of account key a Klaytn account can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "keyType", content = "key", rename_all = "camelCase")]
pub enum AccountKey {
    /// The address is derived from the key that controls it
    Legacy,
    /// A single public key, decoupled from the address
    Public(PublicKey),
    /// Every transaction from the account fails
    Fail,
    /// A weighted multisig key
    WeightedMultiSig(AccountKeyWeightedMultiSig),
    /// One account key per role
    RoleBased(Vec<AccountKey>),
    /// Leaves the role's existing key unchanged on update
    Nil,
}

impl AccountKey {
    /// The Klaytn account key type tag.
    pub fn type_tag(&self) -> u8 {
        match self {
            Self::Legacy => 0x01,
            Self::Public(_) => 0x02,
            Self::Fail => 0x03,
            Self::WeightedMultiSig(_) => 0x04,
            Self::RoleBased(_) => 0x05,
            Self::Nil => 0x80,
        }
    }

    /// Returns true for [`AccountKey::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }
}
