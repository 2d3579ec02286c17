//! A keyring holding a separate key list for each role.

use crate::account::{Account, AccountKeyOptions, WeightedMultiSigOptions};
use crate::crypto::PrivateKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::helper::{format_keys, KeyInput};
use crate::keyring::role::require_role;
use crate::keyring::{AbstractKeyring, KeyRole, ROLE_LAST};
use crate::keystore::{EncryptOptions, Keystore};
use crate::types::Address;

/// A keyring with one key list per [`KeyRole`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleBasedKeyring {
    address: Address,
    keys: [Vec<PrivateKey>; ROLE_LAST],
}

fn format_role_keys<R, I, K>(role_keys: R) -> KlaytnResult<[Vec<PrivateKey>; ROLE_LAST]>
where
    R: IntoIterator<Item = I>,
    I: IntoIterator<Item = K>,
    K: Into<KeyInput>,
{
    let mut keys: [Vec<PrivateKey>; ROLE_LAST] = Default::default();
    for (role, role_list) in role_keys.into_iter().enumerate() {
        if role >= ROLE_LAST {
            return Err(KlaytnError::InvalidKeyListFormat(format!(
                "expected at most {ROLE_LAST} role key lists"
            )));
        }
        keys[role] = format_keys(role_list)?;
    }
    Ok(keys)
}

impl RoleBasedKeyring {
    /// Creates a keyring from an address and up to three key lists, in role
    /// order. Roles without a list are left empty.
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::InvalidKeyListFormat`] if more than three lists are given
    /// - [`KlaytnError::InvalidKeyFormat`] if a key string is malformed
    pub fn new<R, I, K>(address: Address, role_keys: R) -> KlaytnResult<Self>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        Ok(Self {
            address,
            keys: format_role_keys(role_keys)?,
        })
    }

    /// Returns the key lists, in role order.
    pub fn keys(&self) -> &[Vec<PrivateKey>; ROLE_LAST] {
        &self.keys
    }

    /// Replaces all key lists.
    pub fn set_keys<R, I, K>(&mut self, role_keys: R) -> KlaytnResult<()>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        self.keys = format_role_keys(role_keys)?;
        Ok(())
    }

    /// Replaces the key list of one role.
    pub fn set_role_keys<I, K>(&mut self, role: KeyRole, keys: I) -> KlaytnResult<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        let role = role.validate()?;
        self.keys[role] = format_keys(keys)?;
        Ok(())
    }

    /// The keys of the transaction role, without fallback.
    pub fn role_transaction_key(&self) -> &[PrivateKey] {
        &self.keys[KeyRole::TRANSACTION.index()]
    }

    /// The keys of the account-update role, without fallback.
    pub fn role_account_update_key(&self) -> &[PrivateKey] {
        &self.keys[KeyRole::ACCOUNT_UPDATE.index()]
    }

    /// The keys of the fee-payer role, without fallback.
    pub fn role_fee_payer_key(&self) -> &[PrivateKey] {
        &self.keys[KeyRole::FEE_PAYER.index()]
    }

    /// Returns the public key strings, per role.
    pub fn get_public_key(&self, compressed: bool) -> Vec<Vec<String>> {
        self.keys
            .iter()
            .map(|keys| {
                keys.iter()
                    .map(|key| key.get_public_key(compressed))
                    .collect()
            })
            .collect()
    }

    /// Derives the account descriptor: a role-based account key.
    ///
    /// Each role becomes [`AccountKey::Nil`](crate::account::AccountKey::Nil)
    /// with no keys, a public key with one key and a weighted multisig key
    /// with several.
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::InvalidOptionsShape`] for more than three option entries
    /// - [`KlaytnError::InvalidWeightedMultiSigOptions`] if a role's options
    ///   do not match its keys
    pub fn to_account(&self, options: Option<&[WeightedMultiSigOptions]>) -> KlaytnResult<Account> {
        let role_public_keys: Vec<Vec<_>> = self
            .keys
            .iter()
            .map(|keys| keys.iter().map(PrivateKey::public_key).collect())
            .collect();
        let options = options.map(|options| AccountKeyOptions::PerRole(options.to_vec()));
        Account::create_with_account_key_role_based(
            self.address,
            &role_public_keys,
            options.as_ref(),
        )
    }
}

impl AbstractKeyring for RoleBasedKeyring {
    fn address(&self) -> Address {
        self.address
    }

    fn get_key_by_role(&self, role: impl Into<Option<KeyRole>>) -> KlaytnResult<&[PrivateKey]> {
        let role = require_role(role)?;
        let keys = &self.keys[role];
        if !keys.is_empty() || role == KeyRole::TRANSACTION.index() {
            return Ok(keys);
        }
        let fallback = self.role_transaction_key();
        if fallback.is_empty() {
            return Err(KlaytnError::RoleKeyMissing { role });
        }
        Ok(fallback)
    }

    fn is_decoupled(&self) -> bool {
        true
    }

    fn encrypt(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore> {
        Keystore::encrypt_role_based(self.address, &self.keys, password, options)
    }
}
