//! Keyring construction.

use crate::crypto::PrivateKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::helper::{format_key, KeyInput, KeyMaterial};
use crate::keyring::{Keyring, MultipleKeyring, RoleBasedKeyring, SingleKeyring, ROLE_LAST};
use crate::keystore::Keystore;
use crate::types::Address;
use tracing::debug;

const WALLET_KEY_SEPARATOR: &str = "0x";
const WALLET_KEY_TYPE: &str = "00";

/// Creates keyrings from fresh keys, key material, wallet keys and keystores.
#[derive(Debug, Clone, Copy)]
pub struct KeyringFactory;

impl KeyringFactory {
    /// Generates a single keyring with a random key and its derived address.
    pub fn generate() -> SingleKeyring {
        let key = PrivateKey::generate();
        let address = key.derive_address();
        debug!(address = %address, "generated keyring");
        SingleKeyring::new(address, key)
    }

    /// Generates a random private key string.
    pub fn generate_single_key() -> String {
        PrivateKey::generate().to_hex()
    }

    /// Generates `count` random private key strings.
    pub fn generate_multiple_keys(count: usize) -> Vec<String> {
        (0..count).map(|_| Self::generate_single_key()).collect()
    }

    /// Generates random private key strings per role, `counts[i]` for role `i`.
    pub fn generate_role_based_keys(counts: [usize; ROLE_LAST]) -> Vec<Vec<String>> {
        counts
            .iter()
            .map(|&count| Self::generate_multiple_keys(count))
            .collect()
    }

    /// Creates a keyring whose variant follows the shape of the key material:
    /// one key gives a single keyring, a list a multiple keyring and a list of
    /// lists a role-based keyring.
    pub fn create(address: Address, keys: impl Into<KeyMaterial>) -> KlaytnResult<Keyring> {
        match keys.into() {
            KeyMaterial::Single(key) => Ok(Self::create_with_single_key(address, key)?.into()),
            KeyMaterial::Multiple(keys) => Ok(Self::create_with_multiple_key(address, keys)?.into()),
            KeyMaterial::RoleBased(role_keys) => {
                Ok(Self::create_with_role_based_key(address, role_keys)?.into())
            }
        }
    }

    /// Creates a single keyring whose address is derived from the key.
    pub fn create_from_private_key(key: impl Into<KeyInput>) -> KlaytnResult<SingleKeyring> {
        let key = format_key(key)?;
        Self::create_with_single_key(key.derive_address(), key)
    }

    /// Creates a single keyring from a wallet key `0x{key}0x00{address}`.
    ///
    /// # Errors
    ///
    /// Returns [`KlaytnError::InvalidKeyFormat`] if the string is not a
    /// valid wallet key.
    pub fn create_from_klaytn_wallet_key(wallet_key: &str) -> KlaytnResult<SingleKeyring> {
        let invalid = || KlaytnError::invalid_key("invalid Klaytn wallet key");

        let body = wallet_key
            .strip_prefix(WALLET_KEY_SEPARATOR)
            .unwrap_or(wallet_key);
        let parts: Vec<&str> = body.split(WALLET_KEY_SEPARATOR).collect();
        let [key, key_type, address] = parts.as_slice() else {
            return Err(invalid());
        };
        if *key_type != WALLET_KEY_TYPE {
            return Err(invalid());
        }
        let key = PrivateKey::from_hex(key).map_err(|_| invalid())?;
        let address = Address::from_hex(address).map_err(|_| invalid())?;
        Self::create_with_single_key(address, key)
    }

    /// Creates a single keyring.
    pub fn create_with_single_key(
        address: Address,
        key: impl Into<KeyInput>,
    ) -> KlaytnResult<SingleKeyring> {
        let keyring = SingleKeyring::from_key(address, key)?;
        debug!(address = %address, kind = "single", "created keyring");
        Ok(keyring)
    }

    /// Creates a multiple keyring.
    pub fn create_with_multiple_key<I, K>(address: Address, keys: I) -> KlaytnResult<MultipleKeyring>
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        let keyring = MultipleKeyring::new(address, keys)?;
        debug!(
            address = %address,
            kind = "multiple",
            keys = keyring.keys().map_or(0, <[PrivateKey]>::len),
            "created keyring"
        );
        Ok(keyring)
    }

    /// Creates a role-based keyring from up to three key lists.
    pub fn create_with_role_based_key<R, I, K>(
        address: Address,
        role_keys: R,
    ) -> KlaytnResult<RoleBasedKeyring>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = K>,
        K: Into<KeyInput>,
    {
        let keyring = RoleBasedKeyring::new(address, role_keys)?;
        debug!(
            address = %address,
            kind = "role-based",
            keys = keyring.keys().iter().map(Vec::len).sum::<usize>(),
            "created keyring"
        );
        Ok(keyring)
    }

    /// Decrypts a keystore into a keyring.
    pub fn decrypt(keystore: &Keystore, password: &str) -> KlaytnResult<Keyring> {
        keystore.decrypt(password)
    }
}
