//! Encrypted keystores.
//!
//! Keyrings are exported as keystore v4 JSON, where the `keyring` field
//! holds one encrypted entry per key: a flat list for single and multiple
//! keyrings, or one list per role for role-based keyrings. Single keyrings
//! can also be exported in the keystore v3 layout, with one `crypto` entry.
//!
//! Each entry derives a key from the password with scrypt or
//! pbkdf2-hmac-sha256, encrypts the private key with AES-128-CTR and
//! authenticates the ciphertext with `keccak256(derived[16..32] || ciphertext)`.
//!
//! # Example
//!
//! ```rust
//! use klaytn_rust_sdk::keyring::{AbstractKeyring, Keyring, KeyringFactory};
//! use klaytn_rust_sdk::keystore::{EncryptOptions, Keystore};
//!
//! let keyring = KeyringFactory::generate();
//! let options = EncryptOptions::builder().n(1024).build();
//! let keystore = keyring.encrypt("password", &options).unwrap();
//!
//! let json = keystore.to_json().unwrap();
//! let restored = KeyringFactory::decrypt(&Keystore::from_json(&json).unwrap(), "password").unwrap();
//! assert!(matches!(restored, Keyring::Single(_)));
//! ```

mod crypto;
mod options;

pub use options::{
    EncryptOptions, EncryptOptionsBuilder, Kdf, AES_128_CTR, HMAC_SHA256, IV_LENGTH, MAX_DKLEN,
    MAX_SCRYPT_MEMORY, MAX_SCRYPT_P, MIN_DKLEN, SALT_LENGTH,
};

use crate::crypto::PrivateKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::{Keyring, MultipleKeyring, RoleBasedKeyring, SingleKeyring, ROLE_LAST};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Keystore layout with a single `crypto` entry.
pub const KEYSTORE_V3: u32 = 3;
/// Keystore layout with a `keyring` list.
pub const KEYSTORE_V4: u32 = 4;

/// AES-128-CTR parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// Hex-encoded 16-byte IV
    pub iv: String,
}

/// KDF parameters; scrypt uses `n`, `r`, `p` and pbkdf2 uses `c`, `prf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Derived key length in bytes
    pub dklen: usize,
    /// Hex-encoded salt
    pub salt: String,
    /// scrypt cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// scrypt block size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    /// scrypt parallelization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// pbkdf2 iteration count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<u32>,
    /// pbkdf2 pseudo-random function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
}

/// One encrypted private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedKey {
    /// Hex-encoded ciphertext
    pub ciphertext: String,
    /// Cipher parameters
    pub cipherparams: CipherParams,
    /// Cipher name
    pub cipher: String,
    /// KDF name
    pub kdf: String,
    /// KDF parameters
    pub kdfparams: KdfParams,
    /// Hex-encoded MAC
    pub mac: String,
}

/// The `keyring` field of a v4 keystore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeystoreKeyring {
    /// One entry list per role
    RoleBased(Vec<Vec<EncryptedKey>>),
    /// One entry per key
    Flat(Vec<EncryptedKey>),
}

/// A keystore document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystore {
    /// Layout version, 3 or 4
    pub version: u32,
    /// Keystore id
    pub id: String,
    /// The keyring address
    pub address: Address,
    /// Encrypted keys (v4)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyring: Option<KeystoreKeyring>,
    /// Encrypted key (v3)
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "Crypto")]
    pub crypto: Option<EncryptedKey>,
}

fn keystore_id(options: &EncryptOptions) -> String {
    options.uuid.unwrap_or_else(Uuid::new_v4).to_string()
}

fn encrypt_all(
    keys: &[PrivateKey],
    password: &str,
    options: &EncryptOptions,
) -> KlaytnResult<Vec<EncryptedKey>> {
    keys.iter()
        .map(|key| crypto::encrypt_key(key, password, options))
        .collect()
}

impl Keystore {
    /// Encrypts a flat key list into a v4 keystore.
    pub(crate) fn encrypt_flat(
        address: Address,
        keys: &[PrivateKey],
        password: &str,
        options: &EncryptOptions,
    ) -> KlaytnResult<Self> {
        debug!(address = %address, version = KEYSTORE_V4, keys = keys.len(), kdf = %options.kdf, "encrypting keyring");
        Ok(Self {
            version: KEYSTORE_V4,
            id: keystore_id(options),
            address,
            keyring: Some(KeystoreKeyring::Flat(encrypt_all(keys, password, options)?)),
            crypto: None,
        })
    }

    /// Encrypts per-role key lists into a v4 keystore.
    pub(crate) fn encrypt_role_based(
        address: Address,
        role_keys: &[Vec<PrivateKey>],
        password: &str,
        options: &EncryptOptions,
    ) -> KlaytnResult<Self> {
        debug!(
            address = %address,
            version = KEYSTORE_V4,
            keys = role_keys.iter().map(Vec::len).sum::<usize>(),
            kdf = %options.kdf,
            "encrypting role-based keyring"
        );
        let entries = role_keys
            .iter()
            .map(|keys| encrypt_all(keys, password, options))
            .collect::<KlaytnResult<Vec<_>>>()?;
        Ok(Self {
            version: KEYSTORE_V4,
            id: keystore_id(options),
            address,
            keyring: Some(KeystoreKeyring::RoleBased(entries)),
            crypto: None,
        })
    }

    /// Encrypts one key into a v3 keystore.
    pub(crate) fn encrypt_v3(
        address: Address,
        key: &PrivateKey,
        password: &str,
        options: &EncryptOptions,
    ) -> KlaytnResult<Self> {
        debug!(address = %address, version = KEYSTORE_V3, kdf = %options.kdf, "encrypting keyring");
        Ok(Self {
            version: KEYSTORE_V3,
            id: keystore_id(options),
            address,
            keyring: None,
            crypto: Some(crypto::encrypt_key(key, password, options)?),
        })
    }

    /// Parses a keystore from JSON.
    pub fn from_json(json: &str) -> KlaytnResult<Self> {
        serde_json::from_str(json).map_err(|e| KlaytnError::keystore(e.to_string()))
    }

    /// Serializes the keystore to JSON.
    pub fn to_json(&self) -> KlaytnResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the keystore to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> KlaytnResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decrypts the keystore into a keyring.
    ///
    /// A v3 keystore and a v4 keystore holding one flat entry become a
    /// single keyring; a longer flat list becomes a multiple keyring and a
    /// nested list becomes a role-based keyring.
    ///
    /// # Errors
    ///
    /// - [`KlaytnError::UnsupportedKeystoreVersion`] for versions other than 3 and 4
    /// - [`KlaytnError::InvalidKeystore`] if the entries are missing or malformed
    /// - [`KlaytnError::UnsupportedKdf`] / [`KlaytnError::UnsupportedCipher`]
    /// - [`KlaytnError::MacMismatch`] if the password is wrong
    pub fn decrypt(&self, password: &str) -> KlaytnResult<Keyring> {
        debug!(address = %self.address, version = self.version, "decrypting keystore");
        match self.version {
            KEYSTORE_V3 => {
                let entry = self
                    .crypto
                    .as_ref()
                    .ok_or_else(|| KlaytnError::keystore("v3 keystore without crypto"))?;
                let key = crypto::decrypt_key(entry, password)?;
                Ok(Keyring::Single(SingleKeyring::new(self.address, key)))
            }
            KEYSTORE_V4 => match &self.keyring {
                None => Err(KlaytnError::keystore("v4 keystore without keyring")),
                Some(KeystoreKeyring::Flat(entries)) => {
                    let mut keys = entries
                        .iter()
                        .map(|entry| crypto::decrypt_key(entry, password))
                        .collect::<KlaytnResult<Vec<_>>>()?;
                    match keys.len() {
                        0 => Err(KlaytnError::keystore("empty keyring")),
                        1 => {
                            let key = keys.remove(0);
                            Ok(Keyring::Single(SingleKeyring::new(self.address, key)))
                        }
                        _ => Ok(Keyring::Multiple(MultipleKeyring::new(self.address, keys)?)),
                    }
                }
                Some(KeystoreKeyring::RoleBased(roles)) => {
                    if roles.is_empty() {
                        return Err(KlaytnError::keystore("empty keyring"));
                    }
                    if roles.len() > ROLE_LAST {
                        return Err(KlaytnError::keystore(format!(
                            "expected at most {ROLE_LAST} role key lists, got {}",
                            roles.len()
                        )));
                    }
                    let role_keys = roles
                        .iter()
                        .map(|entries| {
                            entries
                                .iter()
                                .map(|entry| crypto::decrypt_key(entry, password))
                                .collect::<KlaytnResult<Vec<_>>>()
                        })
                        .collect::<KlaytnResult<Vec<_>>>()?;
                    Ok(Keyring::RoleBased(RoleBasedKeyring::new(
                        self.address,
                        role_keys,
                    )?))
                }
            },
            other => Err(KlaytnError::UnsupportedKeystoreVersion(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fast() -> EncryptOptions {
        EncryptOptions::builder().n(16).build()
    }

    fn address() -> Address {
        Address::new([0x11; 20])
    }

    #[test]
    fn test_v4_flat_json_shape() {
        let keys = vec![PrivateKey::generate(), PrivateKey::generate()];
        let keystore = Keystore::encrypt_flat(address(), &keys, "password", &fast()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&keystore.to_json().unwrap()).unwrap();

        assert_eq!(value["version"], 4);
        assert_eq!(value["address"], "0x1111111111111111111111111111111111111111");
        assert!(value.get("crypto").is_none());
        let entries = value["keyring"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["cipher"], "aes-128-ctr");
        assert_eq!(entries[0]["kdf"], "scrypt");
        let kdfparams = entries[0]["kdfparams"].as_object().unwrap();
        let fields: Vec<&str> = kdfparams.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["dklen", "salt", "n", "r", "p"]);
    }

    #[test]
    fn test_v3_json_shape() {
        let key = PrivateKey::generate();
        let options = EncryptOptions::builder().kdf(Kdf::Pbkdf2).c(16).build();
        let keystore = Keystore::encrypt_v3(address(), &key, "password", &options).unwrap();
        let value = serde_json::to_value(&keystore).unwrap();

        assert_eq!(value["version"], 3);
        assert!(value.get("keyring").is_none());
        let fields: Vec<&str> = value["crypto"]["kdfparams"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(fields, vec!["dklen", "salt", "c", "prf"]);
    }

    #[test]
    fn test_decrypt_shapes() {
        let single = Keystore::encrypt_flat(address(), &[PrivateKey::generate()], "pw", &fast())
            .unwrap();
        assert!(matches!(single.decrypt("pw").unwrap(), Keyring::Single(_)));

        let keys = vec![PrivateKey::generate(), PrivateKey::generate()];
        let multiple = Keystore::encrypt_flat(address(), &keys, "pw", &fast()).unwrap();
        assert!(matches!(multiple.decrypt("pw").unwrap(), Keyring::Multiple(_)));

        let roles = vec![vec![PrivateKey::generate()], vec![], vec![PrivateKey::generate()]];
        let role_based = Keystore::encrypt_role_based(address(), &roles, "pw", &fast()).unwrap();
        assert!(matches!(role_based.decrypt("pw").unwrap(), Keyring::RoleBased(_)));
    }

    #[test]
    fn test_crypto_alias() {
        let key = PrivateKey::generate();
        let keystore = Keystore::encrypt_v3(address(), &key, "pw", &fast()).unwrap();
        let mut value = serde_json::to_value(&keystore).unwrap();
        let entry = value.as_object_mut().unwrap().remove("crypto").unwrap();
        value["Crypto"] = entry;

        let parsed = Keystore::from_json(&value.to_string()).unwrap();
        let Keyring::Single(keyring) = parsed.decrypt("pw").unwrap() else {
            panic!("expected a single keyring");
        };
        assert_eq!(keyring.key(), &key);
    }

    #[test]
    fn test_unsupported_version() {
        let mut keystore =
            Keystore::encrypt_flat(address(), &[PrivateKey::generate()], "pw", &fast()).unwrap();
        keystore.version = 2;
        assert!(matches!(
            keystore.decrypt("pw"),
            Err(KlaytnError::UnsupportedKeystoreVersion(2))
        ));
    }

    #[test]
    fn test_missing_entries() {
        let json = json!({
            "version": 4,
            "id": "7a0a8557-22a5-4c90-b554-d6f3b13783ea",
            "address": "0x1111111111111111111111111111111111111111",
        });
        let keystore = Keystore::from_json(&json.to_string()).unwrap();
        assert!(matches!(
            keystore.decrypt("pw"),
            Err(KlaytnError::InvalidKeystore(_))
        ));

        assert!(matches!(
            Keystore::from_json("{not json"),
            Err(KlaytnError::InvalidKeystore(_))
        ));
    }

    #[test]
    fn test_fixed_uuid() {
        let uuid = Uuid::new_v4();
        let options = EncryptOptions::builder().n(16).uuid(uuid).build();
        let keystore =
            Keystore::encrypt_flat(address(), &[PrivateKey::generate()], "pw", &options).unwrap();
        assert_eq!(keystore.id, uuid.to_string());
    }
}
