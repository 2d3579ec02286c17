//! The account descriptor sent in account-update transactions.

use crate::account::{
    fill_weighted_multi_sig_options_for_multi_sig, fill_weighted_multi_sig_options_for_role_based,
    AccountKey, AccountKeyOptions, AccountKeyWeightedMultiSig, WeightedMultiSigOptions,
};
use crate::crypto::PublicKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::ROLE_LAST;
use crate::types::Address;
use serde::{Deserialize, Serialize};

/// An address paired with the account key it should hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    address: Address,
    account_key: AccountKey,
}

impl Account {
    /// Creates an account from an address and an account key.
    pub fn new(address: Address, account_key: AccountKey) -> Self {
        Self {
            address,
            account_key,
        }
    }

    /// Creates an account whose key is derived from its address.
    pub fn create_with_account_key_legacy(address: Address) -> Self {
        Self::new(address, AccountKey::Legacy)
    }

    /// Creates an account controlled by a single public key.
    pub fn create_with_account_key_public(address: Address, public_key: PublicKey) -> Self {
        Self::new(address, AccountKey::Public(public_key))
    }

    /// Creates an account that rejects every transaction.
    pub fn create_with_account_key_fail(address: Address) -> Self {
        Self::new(address, AccountKey::Fail)
    }

    /// Creates an account controlled by a weighted multisig key.
    ///
    /// Absent or empty options default to threshold 1 with weight 1 per key.
    ///
    /// # Errors
    ///
    /// Returns [`KlaytnError::InvalidWeightedMultiSigOptions`] if the options
    /// are inconsistent with the key list.
    pub fn create_with_account_key_weighted_multi_sig(
        address: Address,
        public_keys: &[PublicKey],
        options: Option<&WeightedMultiSigOptions>,
    ) -> KlaytnResult<Self> {
        let options = options.cloned().map(AccountKeyOptions::Single);
        let options =
            fill_weighted_multi_sig_options_for_multi_sig(public_keys.len(), options.as_ref())?;
        let key = AccountKeyWeightedMultiSig::from_public_keys_and_options(public_keys, &options)?;
        Ok(Self::new(address, AccountKey::WeightedMultiSig(key)))
    }

    /// Creates an account with one key per role.
    ///
    /// A role with no keys becomes [`AccountKey::Nil`], a role with one key
    /// becomes [`AccountKey::Public`] and a role with several keys becomes
    /// [`AccountKey::WeightedMultiSig`].
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::InvalidKeyListFormat`] if more than three role lists are given
    /// - [`KlaytnError::InvalidOptionsShape`] if the options are not per role
    /// - [`KlaytnError::InvalidWeightedMultiSigOptions`] if a single-key role is
    ///   given options or a multi-key role's options are inconsistent
    pub fn create_with_account_key_role_based(
        address: Address,
        role_public_keys: &[Vec<PublicKey>],
        options: Option<&AccountKeyOptions>,
    ) -> KlaytnResult<Self> {
        if role_public_keys.len() > ROLE_LAST {
            return Err(KlaytnError::InvalidKeyListFormat(format!(
                "expected at most {ROLE_LAST} role key lists, got {}",
                role_public_keys.len()
            )));
        }
        let mut lengths = [0usize; ROLE_LAST];
        for (length, keys) in lengths.iter_mut().zip(role_public_keys) {
            *length = keys.len();
        }
        let options = fill_weighted_multi_sig_options_for_role_based(lengths, options)?;

        let mut role_keys = Vec::with_capacity(ROLE_LAST);
        for (role, options) in options.iter().enumerate() {
            let keys = role_public_keys.get(role).map(Vec::as_slice).unwrap_or(&[]);
            let key = match keys {
                [] => AccountKey::Nil,
                [public_key] => {
                    if !options.is_empty() {
                        return Err(KlaytnError::InvalidWeightedMultiSigOptions(format!(
                            "role {role} has a single key and cannot take multisig options"
                        )));
                    }
                    AccountKey::Public(*public_key)
                }
                _ => AccountKey::WeightedMultiSig(
                    AccountKeyWeightedMultiSig::from_public_keys_and_options(keys, options)?,
                ),
            };
            role_keys.push(key);
        }
        Ok(Self::new(address, AccountKey::RoleBased(role_keys)))
    }

    /// Returns the address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the account key.
    pub fn account_key(&self) -> &AccountKey {
        &self.account_key
    }
}
