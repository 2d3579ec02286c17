//! Weighted multisig options and the policies that complete them.

use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::ROLE_LAST;
use serde::{Deserialize, Serialize};

/// Threshold and per-key weights for a weighted multisig account key.
///
/// Options are "empty" when neither field is set; empty options are filled
/// with defaults when an account is derived from a keyring.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedMultiSigOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weights: Option<Vec<u32>>,
}

impl WeightedMultiSigOptions {
    /// Creates options with both a threshold and weights.
    pub fn new(threshold: u32, weights: Vec<u32>) -> Self {
        Self {
            threshold: Some(threshold),
            weights: Some(weights),
        }
    }

    /// Creates empty options.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default options for `key_count` keys: threshold 1, weight 1 each.
    pub fn for_key_count(key_count: usize) -> Self {
        Self::new(1, vec![1; key_count])
    }

    /// Sets the threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the weights.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<u32>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Returns the threshold, if set.
    pub fn threshold(&self) -> Option<u32> {
        self.threshold
    }

    /// Returns the weights, if set.
    pub fn weights(&self) -> Option<&[u32]> {
        self.weights.as_deref()
    }

    /// Returns true if neither threshold nor weights is set.
    pub fn is_empty(&self) -> bool {
        self.threshold.is_none() && self.weights.is_none()
    }
}

/// Options passed when deriving an account from a keyring.
///
/// Single and multiple keyrings take [`AccountKeyOptions::Single`];
/// role-based keyrings take one entry per role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountKeyOptions {
    /// Options for each role, in role order
    PerRole(Vec<WeightedMultiSigOptions>),
    /// Options for a single weighted multisig key
    Single(WeightedMultiSigOptions),
}

impl From<WeightedMultiSigOptions> for AccountKeyOptions {
    fn from(options: WeightedMultiSigOptions) -> Self {
        Self::Single(options)
    }
}

impl From<Vec<WeightedMultiSigOptions>> for AccountKeyOptions {
    fn from(options: Vec<WeightedMultiSigOptions>) -> Self {
        Self::PerRole(options)
    }
}

/// Completes the options for a multiple keyring holding `key_count` keys.
///
/// Absent or empty options become threshold 1 with weight 1 per key.
/// Non-empty options are returned unchanged; their consistency with the key
/// list is checked when the account key is built.
pub fn fill_weighted_multi_sig_options_for_multi_sig(
    key_count: usize,
    options: Option<&AccountKeyOptions>,
) -> KlaytnResult<WeightedMultiSigOptions> {
    match options {
        None => Ok(WeightedMultiSigOptions::for_key_count(key_count)),
        Some(AccountKeyOptions::Single(options)) if options.is_empty() => {
            Ok(WeightedMultiSigOptions::for_key_count(key_count))
        }
        Some(AccountKeyOptions::Single(options)) => Ok(options.clone()),
        Some(AccountKeyOptions::PerRole(_)) => Err(KlaytnError::InvalidOptionsShape(
            "options for a multiple keyring must be a single WeightedMultiSigOptions".to_string(),
        )),
    }
}

/// Completes the per-role options for a role-based keyring whose roles hold
/// `lengths[i]` keys.
///
/// Each role without options is given threshold 1 and weight 1 per key if it
/// holds more than one key, and empty options otherwise.
pub fn fill_weighted_multi_sig_options_for_role_based(
    lengths: [usize; ROLE_LAST],
    options: Option<&AccountKeyOptions>,
) -> KlaytnResult<Vec<WeightedMultiSigOptions>> {
    let given: &[WeightedMultiSigOptions] = match options {
        None => &[],
        Some(AccountKeyOptions::PerRole(options)) => {
            if options.len() > ROLE_LAST {
                return Err(KlaytnError::InvalidOptionsShape(format!(
                    "expected at most {ROLE_LAST} role options, got {}",
                    options.len()
                )));
            }
            options
        }
        Some(AccountKeyOptions::Single(_)) => {
            return Err(KlaytnError::InvalidOptionsShape(
                "options for a role-based keyring must be given per role".to_string(),
            ));
        }
    };

    Ok(lengths
        .iter()
        .enumerate()
        .map(|(role, &length)| match given.get(role) {
            Some(options) if !options.is_empty() => options.clone(),
            _ if length > 1 => WeightedMultiSigOptions::for_key_count(length),
            _ => WeightedMultiSigOptions::empty(),
        })
        .collect())
}
