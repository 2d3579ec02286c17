//! A keyring holding one private key.

use crate::account::Account;
use crate::crypto::PrivateKey;
use crate::error::KlaytnResult;
use crate::keyring::helper::{format_key, KeyInput};
use crate::keyring::role::require_role;
use crate::keyring::{AbstractKeyring, KeyRole};
use crate::keystore::{EncryptOptions, Keystore};
use crate::types::Address;
use std::slice;

/// A keyring whose one key is used for every role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleKeyring {
    address: Address,
    key: PrivateKey,
}

impl SingleKeyring {
    /// Creates a keyring from an address and a key.
    pub fn new(address: Address, key: PrivateKey) -> Self {
        Self { address, key }
    }

    /// Creates a keyring from an address and a key given as a
    /// [`PrivateKey`] or hex string.
    pub fn from_key(address: Address, key: impl Into<KeyInput>) -> KlaytnResult<Self> {
        Ok(Self::new(address, format_key(key)?))
    }

    /// Returns the key.
    pub fn key(&self) -> &PrivateKey {
        &self.key
    }

    /// Replaces the key.
    pub fn set_key(&mut self, key: impl Into<KeyInput>) -> KlaytnResult<()> {
        self.key = format_key(key)?;
        Ok(())
    }

    /// Returns the public key string.
    pub fn get_public_key(&self, compressed: bool) -> String {
        self.key.get_public_key(compressed)
    }

    /// Derives the account descriptor: a public account key.
    pub fn to_account(&self) -> Account {
        Account::create_with_account_key_public(self.address, self.key.public_key())
    }

    /// Encrypts the key into a v3 keystore.
    pub fn encrypt_v3(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore> {
        Keystore::encrypt_v3(self.address, &self.key, password, options)
    }

    /// Returns the Klaytn wallet key, `0x{key}0x00{address}`.
    pub fn get_klaytn_wallet_key(&self) -> String {
        format!("{}0x00{}", self.key.to_hex(), self.address.to_hex())
    }
}

impl AbstractKeyring for SingleKeyring {
    fn address(&self) -> Address {
        self.address
    }

    fn get_key_by_role(&self, role: impl Into<Option<KeyRole>>) -> KlaytnResult<&[PrivateKey]> {
        require_role(role)?;
        Ok(slice::from_ref(&self.key))
    }

    fn is_decoupled(&self) -> bool {
        self.address != self.key.derive_address()
    }

    fn encrypt(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore> {
        Keystore::encrypt_flat(self.address, slice::from_ref(&self.key), password, options)
    }
}
