//! Keyrings: private keys bound to a Klaytn address.
//!
//! Because a Klaytn account's key can be changed independently of its
//! address, a keyring stores the address alongside the keys that control it.
//!
//! # Keyring Types
//!
//! - [`SingleKeyring`] - one key used for every role
//! - [`MultipleKeyring`] - a list of keys used for every role
//! - [`RoleBasedKeyring`] - a separate key list for each [`KeyRole`]
//!
//! All three implement [`AbstractKeyring`], which provides the shared
//! signing operations. [`Keyring`] wraps any of them.
//!
//! # Example
//!
//! ```rust
//! use klaytn_rust_sdk::crypto::hash_message;
//! use klaytn_rust_sdk::keyring::{AbstractKeyring, KeyRole, KeyringFactory};
//!
//! let keyring = KeyringFactory::generate();
//! let hash = format!("0x{}", "ab".repeat(32));
//! let signature = keyring
//!     .sign_with_key(&hash, 1001u64, KeyRole::TRANSACTION, 0)
//!     .unwrap();
//! assert!(signature.v() == 2037 || signature.v() == 2038);
//!
//! let signed = keyring.sign_message("hello", None, None).unwrap();
//! assert_eq!(signed.message_hash, hash_message("hello"));
//! ```

mod factory;
pub mod helper;
mod multiple;
mod role;
mod role_based;
mod single;

pub use factory::KeyringFactory;
pub use helper::{KeyInput, KeyMaterial};
pub use multiple::MultipleKeyring;
pub use role::{KeyRole, KEY_ROLE, ROLE_LAST};
pub use role_based::RoleBasedKeyring;
pub use single::SingleKeyring;

use crate::account::{Account, AccountKeyOptions};
use crate::config::KlaytnConfig;
use crate::crypto::{hash_message, parse_hash, PrivateKey, SignatureData};
use crate::error::{KlaytnError, KlaytnResult};
use crate::keystore::{EncryptOptions, Keystore};
use crate::types::{Address, IntoChainId};
use helper::{validate_for_signing, validate_index_with_keys};
use serde::{Deserialize, Serialize};

/// The result of signing an off-chain message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedMessage {
    /// The prefixed Keccak-256 hash that was signed
    pub message_hash: String,
    /// The signature, with `v = recovery_id + 27`
    pub signature: SignatureData,
    /// The original message
    pub message: String,
}

/// The capability shared by all keyring variants.
///
/// Implementors supply key lookup by role; the signing operations are
/// provided on top of it and validate every input before any key is used.
pub trait AbstractKeyring: Clone {
    /// Returns the address this keyring signs for.
    fn address(&self) -> Address;

    /// Returns the keys used for `role`.
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::RoleRequired`] if no role is given
    /// - [`KlaytnError::InvalidRole`] if the role is not below [`ROLE_LAST`]
    fn get_key_by_role(&self, role: impl Into<Option<KeyRole>>) -> KlaytnResult<&[PrivateKey]>;

    /// Returns true if the address is not derived from the keyring's key.
    fn is_decoupled(&self) -> bool;

    /// Encrypts the keyring into a v4 keystore.
    fn encrypt(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore>;

    /// Encrypts the keyring with the encryption options of `config`.
    fn encrypt_with_config(&self, password: &str, config: &KlaytnConfig) -> KlaytnResult<Keystore> {
        self.encrypt(password, config.encrypt_options())
    }

    /// Returns a keyring with the same address that shares this keyring's
    /// key handles.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Signs a transaction hash with the key at `index` for `role`.
    ///
    /// # Errors
    ///
    /// [`KlaytnError::InvalidHashFormat`], [`KlaytnError::InvalidChainId`],
    /// [`KlaytnError::RoleRequired`], [`KlaytnError::InvalidRole`] or
    /// [`KlaytnError::IndexOutOfRange`], checked in that order.
    fn sign_with_key(
        &self,
        hash: &str,
        chain_id: impl IntoChainId,
        role: impl Into<Option<KeyRole>>,
        index: usize,
    ) -> KlaytnResult<SignatureData> {
        let (digest, chain_id) = validate_for_signing(hash, chain_id)?;
        let keys = self.get_key_by_role(role)?;
        validate_index_with_keys(index, keys.len())?;
        keys[index].sign_digest(&digest, chain_id)
    }

    /// Signs a transaction hash with every key for `role`, in key order.
    fn sign_with_keys(
        &self,
        hash: &str,
        chain_id: impl IntoChainId,
        role: impl Into<Option<KeyRole>>,
    ) -> KlaytnResult<Vec<SignatureData>> {
        let (digest, chain_id) = validate_for_signing(hash, chain_id)?;
        let keys = self.get_key_by_role(role)?;
        keys.iter()
            .map(|key| key.sign_digest(&digest, chain_id))
            .collect()
    }

    /// Signs an off-chain message.
    ///
    /// With neither role nor index, the first transaction-role key signs.
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::NoDefaultKey`] if no transaction-role key exists
    /// - [`KlaytnError::IncompleteSigningParams`] if only one of role and index is given
    /// - the errors of [`AbstractKeyring::get_key_by_role`] and
    ///   [`KlaytnError::IndexOutOfRange`]
    fn sign_message(
        &self,
        message: &str,
        role: Option<KeyRole>,
        index: Option<usize>,
    ) -> KlaytnResult<SignedMessage> {
        let message_hash = hash_message(message);
        let digest = parse_hash(&message_hash)?;

        let key = match (role, index) {
            (None, None) => self
                .get_key_by_role(KeyRole::TRANSACTION)?
                .first()
                .ok_or(KlaytnError::NoDefaultKey)?,
            (Some(role), Some(index)) => {
                let keys = self.get_key_by_role(role)?;
                validate_index_with_keys(index, keys.len())?;
                &keys[index]
            }
            _ => return Err(KlaytnError::IncompleteSigningParams),
        };

        Ok(SignedMessage {
            signature: key.sign_message_digest(&digest)?,
            message_hash,
            message: message.to_string(),
        })
    }
}

/// Public keys of a keyring, in the shape of its key storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicKeys {
    /// The key of a single keyring
    Single(String),
    /// The keys of a multiple keyring, in key order
    Multiple(Vec<String>),
    /// The keys of a role-based keyring, per role
    RoleBased(Vec<Vec<String>>),
}

/// Any keyring variant.
#[derive(Clone, Debug)]
pub enum Keyring {
    /// A single keyring
    Single(SingleKeyring),
    /// A multiple keyring
    Multiple(MultipleKeyring),
    /// A role-based keyring
    RoleBased(RoleBasedKeyring),
}

impl Keyring {
    /// Returns the public keys in the shape of the variant's key storage.
    pub fn get_public_key(&self, compressed: bool) -> PublicKeys {
        match self {
            Keyring::Single(keyring) => PublicKeys::Single(keyring.get_public_key(compressed)),
            Keyring::Multiple(keyring) => PublicKeys::Multiple(keyring.get_public_key(compressed)),
            Keyring::RoleBased(keyring) => {
                PublicKeys::RoleBased(keyring.get_public_key(compressed))
            }
        }
    }

    /// Derives the account descriptor for this keyring.
    ///
    /// # Errors
    ///
    /// Returns [`KlaytnError::InvalidOptionsShape`] when the options do not
    /// match the variant: single keyrings take no options, multiple keyrings
    /// take [`AccountKeyOptions::Single`] and role-based keyrings take
    /// [`AccountKeyOptions::PerRole`].
    pub fn to_account(&self, options: Option<&AccountKeyOptions>) -> KlaytnResult<Account> {
        match (self, options) {
            (Keyring::Single(keyring), None) => Ok(keyring.to_account()),
            (Keyring::Single(_), Some(_)) => Err(KlaytnError::InvalidOptionsShape(
                "a single keyring does not take account key options".to_string(),
            )),
            (Keyring::Multiple(keyring), None) => keyring.to_account(None),
            (Keyring::Multiple(keyring), Some(AccountKeyOptions::Single(options))) => {
                keyring.to_account(Some(options))
            }
            (Keyring::Multiple(_), Some(AccountKeyOptions::PerRole(_))) => {
                Err(KlaytnError::InvalidOptionsShape(
                    "options for a multiple keyring must be a single WeightedMultiSigOptions"
                        .to_string(),
                ))
            }
            (Keyring::RoleBased(keyring), None) => keyring.to_account(None),
            (Keyring::RoleBased(keyring), Some(AccountKeyOptions::PerRole(options))) => {
                keyring.to_account(Some(options.as_slice()))
            }
            (Keyring::RoleBased(_), Some(AccountKeyOptions::Single(_))) => {
                Err(KlaytnError::InvalidOptionsShape(
                    "options for a role-based keyring must be given per role".to_string(),
                ))
            }
        }
    }

    /// Returns the single keyring, if this is one.
    pub fn as_single(&self) -> Option<&SingleKeyring> {
        match self {
            Keyring::Single(keyring) => Some(keyring),
            _ => None,
        }
    }

    /// Returns the multiple keyring, if this is one.
    pub fn as_multiple(&self) -> Option<&MultipleKeyring> {
        match self {
            Keyring::Multiple(keyring) => Some(keyring),
            _ => None,
        }
    }

    /// Returns the role-based keyring, if this is one.
    pub fn as_role_based(&self) -> Option<&RoleBasedKeyring> {
        match self {
            Keyring::RoleBased(keyring) => Some(keyring),
            _ => None,
        }
    }
}

impl AbstractKeyring for Keyring {
    fn address(&self) -> Address {
        match self {
            Keyring::Single(keyring) => keyring.address(),
            Keyring::Multiple(keyring) => keyring.address(),
            Keyring::RoleBased(keyring) => keyring.address(),
        }
    }

    fn get_key_by_role(&self, role: impl Into<Option<KeyRole>>) -> KlaytnResult<&[PrivateKey]> {
        match self {
            Keyring::Single(keyring) => keyring.get_key_by_role(role),
            Keyring::Multiple(keyring) => keyring.get_key_by_role(role),
            Keyring::RoleBased(keyring) => keyring.get_key_by_role(role),
        }
    }

    fn is_decoupled(&self) -> bool {
        match self {
            Keyring::Single(keyring) => keyring.is_decoupled(),
            Keyring::Multiple(keyring) => keyring.is_decoupled(),
            Keyring::RoleBased(keyring) => keyring.is_decoupled(),
        }
    }

    fn encrypt(&self, password: &str, options: &EncryptOptions) -> KlaytnResult<Keystore> {
        match self {
            Keyring::Single(keyring) => keyring.encrypt(password, options),
            Keyring::Multiple(keyring) => keyring.encrypt(password, options),
            Keyring::RoleBased(keyring) => keyring.encrypt(password, options),
        }
    }
}

impl From<SingleKeyring> for Keyring {
    fn from(keyring: SingleKeyring) -> Self {
        Keyring::Single(keyring)
    }
}

impl From<MultipleKeyring> for Keyring {
    fn from(keyring: MultipleKeyring) -> Self {
        Keyring::Multiple(keyring)
    }
}

impl From<RoleBasedKeyring> for Keyring {
    fn from(keyring: RoleBasedKeyring) -> Self {
        Keyring::RoleBased(keyring)
    }
}
