//! A keyring holding a list of private keys.

use crate::account::{Account, WeightedMultiSigOptions};
use crate::crypto::PrivateKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::helper::{format_keys, KeyInput};
use crate::keyring::role::require_role;
use crate::keyring::{AbstractKeyring, KeyRole};
use crate::keystore::{EncryptOptions, Keystore};
use crate::types::Address;

/// A keyring whose key list is used identically for every role.
///
/// The key list may be cleared to an explicit "no keys" state with
/// [`MultipleKeyring::set_keys`], which is distinct from an empty list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipleKeyring {
    address: Address,
    keys: Option<Vec<PrivateKey>>,
}

impl MultipleKeyring {
    /// Creates a keyring from an address and keys given as [`PrivateKey`]s
    /// or hex strings. Order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`KlaytnError::InvalidKeyFormat`] if a key string is malformed.
    pub fn new<I, K>(address: Address, keys: I) -> KlaytnResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        Ok(Self {
            address,
            keys: Some(format_keys(keys)?),
        })
    }

    /// Returns the keys, or `None` in the "no keys" state.
    pub fn keys(&self) -> Option<&[PrivateKey]> {
        self.keys.as_deref()
    }

    /// Replaces the key list; `None` clears it to the "no keys" state.
    pub fn set_keys<I, K>(&mut self, keys: Option<I>) -> KlaytnResult<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        self.keys = keys.map(format_keys).transpose()?;
        Ok(())
    }

    fn key_list(&self) -> &[PrivateKey] {
        self.keys.as_deref().unwrap_or(&[])
    }

    /// Returns the public key strings, in key order.
    pub fn get_public_key(&self, compressed: bool) -> Vec<String> {
        self.key_list()
            .iter()
            .map(|key| key.get_public_key(compressed))
            .collect()
    }

    /// Derives the account descriptor: a weighted multisig account key.
    ///
    /// Absent or empty options default to threshold 1 with weight 1 per key.
    pub fn to_account(&self, options: Option<&WeightedMultiSigOptions>) -> KlaytnResult<Account> {
        let public_keys: Vec<_> = self.key_list().iter().map(PrivateKey::public_key).collect();
        Account::create_with_account_key_weighted_multi_sig(self.address, &public_keys, options)
    }
}

impl AbstractKeyring for MultipleKeyring {
    fn address(&self) -> Address {
        self.address
    }

    fn get_key_by_role(&self, role: impl Into<Option<KeyRole>>) -> KlaytnResult<&[PrivateKey]> {
        require_role(role)?;
        Ok(self.key_list())
    }

    fn is_decoupled(&self) -> bool {
        true
    }

    fn encrypt(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore> {
        let keys = self.keys.as_deref().ok_or_else(|| {
            KlaytnError::InvalidKeyListFormat("the keyring holds no keys to encrypt".to_string())
        })?;
        Keystore::encrypt_flat(self.address, keys, password, options)
    }
}
