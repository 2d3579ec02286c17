//! Secp256k1 private keys with Klaytn signing.

use crate::crypto::hash::parse_hash;
use crate::crypto::signature::{MESSAGE_V_OFFSET, TRANSACTION_V_OFFSET};
use crate::crypto::{PublicKey, SignatureData};
use crate::error::{KlaytnError, KlaytnResult};
use crate::types::{Address, ChainId, IntoChainId};
use k256::ecdsa::SigningKey;
use std::fmt;
use std::sync::Arc;

/// Private key length in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// A secp256k1 private key.
///
/// Cloning a `PrivateKey` yields another handle to the same key material;
/// the secret scalar is zeroized when the last handle is dropped.
#[derive(Clone)]
pub struct PrivateKey {
    inner: Arc<SigningKey>,
}

impl PrivateKey {
    /// Generates a new random private key from the OS CSPRNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
        Self {
            inner: Arc::new(signing_key),
        }
    }

    /// Creates a private key from raw bytes.
    ///
    /// Fails if the bytes are not 32 bytes long or do not encode a scalar in
    /// `[1, n)`.
    pub fn from_bytes(bytes: &[u8]) -> KlaytnResult<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(KlaytnError::invalid_key(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| KlaytnError::invalid_key("scalar is zero or not below the curve order"))?;
        Ok(Self {
            inner: Arc::new(signing_key),
        })
    }

    /// Creates a private key from 64 hex characters (`0x` prefix optional).
    pub fn from_hex(hex_str: &str) -> KlaytnResult<Self> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        if digits.len() != PRIVATE_KEY_LENGTH * 2 || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(KlaytnError::invalid_key(format!(
                "expected {} hex characters",
                PRIVATE_KEY_LENGTH * 2
            )));
        }
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| KlaytnError::invalid_key(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns true if `value` parses as a private key.
    pub fn is_valid(value: &str) -> bool {
        Self::from_hex(value).is_ok()
    }

    /// Returns the private key as bytes.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes().into()
    }

    /// Returns the private key as `0x` + 64 lower-case hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.to_bytes()))
    }

    /// Returns the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// Returns the public key string, compressed or uncompressed.
    pub fn get_public_key(&self, compressed: bool) -> String {
        let public_key = self.public_key();
        if compressed {
            public_key.to_compressed_hex()
        } else {
            public_key.to_hex()
        }
    }

    /// Derives the address controlled by this key.
    pub fn derive_address(&self) -> Address {
        self.public_key().to_address()
    }

    /// Returns true if both handles point at the same key material.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Signs a transaction hash, binding the chain id into `v`.
    ///
    /// `v = recovery_id + chain_id * 2 + 35`.
    pub fn sign(&self, hash: &str, chain_id: impl IntoChainId) -> KlaytnResult<SignatureData> {
        let digest = parse_hash(hash)?;
        let chain_id = chain_id.into_chain_id()?;
        self.sign_digest(&digest, chain_id)
    }

    pub(crate) fn sign_digest(
        &self,
        digest: &[u8; 32],
        chain_id: ChainId,
    ) -> KlaytnResult<SignatureData> {
        let offset = chain_id
            .id()
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(TRANSACTION_V_OFFSET))
            .ok_or_else(|| KlaytnError::InvalidChainId(format!("{chain_id} is too large")))?;
        let (signature, recid) = self
            .inner
            .sign_prehash_recoverable(digest)
            .map_err(|e| KlaytnError::Internal(format!("signing failed: {e}")))?;
        Ok(SignatureData::from_recoverable(&signature, recid, offset))
    }

    /// Signs a message hash (as produced by [`crate::crypto::hash_message`])
    /// with `v = recovery_id + 27`.
    pub fn sign_message(&self, message_hash: &str) -> KlaytnResult<SignatureData> {
        let digest = parse_hash(message_hash)?;
        self.sign_message_digest(&digest)
    }

    pub(crate) fn sign_message_digest(&self, digest: &[u8; 32]) -> KlaytnResult<SignatureData> {
        let (signature, recid) = self
            .inner
            .sign_prehash_recoverable(digest)
            .map_err(|e| KlaytnError::Internal(format!("signing failed: {e}")))?;
        Ok(SignatureData::from_recoverable(
            &signature,
            recid,
            MESSAGE_V_OFFSET,
        ))
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash_message, parse_hash};

    const KEY: &str = "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8";

    #[test]
    fn test_from_hex_roundtrip() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        assert_eq!(key.to_hex(), KEY);

        let without_prefix = PrivateKey::from_hex(&KEY[2..]).unwrap();
        assert_eq!(without_prefix, key);
    }

    #[test]
    fn test_invalid_private_keys() {
        for bad in ["", "0x", "0x1234", "not-a-key"] {
            assert!(matches!(
                PrivateKey::from_hex(bad),
                Err(KlaytnError::InvalidKeyFormat(_))
            ));
        }
        let zero = format!("0x{}", "00".repeat(32));
        assert!(PrivateKey::from_hex(&zero).is_err());
        // Curve order n is not a valid scalar
        let order = "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(PrivateKey::from_hex(order).is_err());
        assert!(!PrivateKey::is_valid(order));
        assert!(PrivateKey::is_valid(KEY));
    }

    #[test]
    fn test_get_public_key() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        assert_eq!(key.get_public_key(false).len(), 2 + 128);
        assert_eq!(key.get_public_key(true).len(), 2 + 66);
        assert_eq!(key.get_public_key(false), key.public_key().to_hex());
    }

    #[test]
    fn test_sign_binds_chain_id() {
        let key = PrivateKey::generate();
        let hash = format!("0x{}", "11".repeat(32));
        let signature = key.sign(&hash, 1001u64).unwrap();

        let recid = signature.v() - 35 - 2 * 1001;
        assert!(recid == 0 || recid == 1);

        let digest = parse_hash(&hash).unwrap();
        let recovered = signature
            .recover_public_key(&digest, Some(ChainId::baobab()))
            .unwrap();
        assert_eq!(recovered, key.public_key());
    }

    #[test]
    fn test_sign_rejects_invalid_input() {
        let key = PrivateKey::generate();
        assert!(matches!(
            key.sign("0x1234", 1001u64),
            Err(KlaytnError::InvalidHashFormat(_))
        ));
        let hash = format!("0x{}", "11".repeat(32));
        assert!(matches!(
            key.sign(&hash, "baobab"),
            Err(KlaytnError::InvalidChainId(_))
        ));
        assert!(matches!(
            key.sign(&hash, -1i64),
            Err(KlaytnError::InvalidChainId(_))
        ));
    }

    #[test]
    fn test_sign_message() {
        let key = PrivateKey::generate();
        let message_hash = hash_message("hello");
        let signature = key.sign_message(&message_hash).unwrap();
        assert!(signature.v() == 27 || signature.v() == 28);

        let digest = parse_hash(&message_hash).unwrap();
        let recovered = signature.recover_public_key(&digest, None).unwrap();
        assert_eq!(recovered.to_address(), key.derive_address());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        let hash = format!("0x{}", "42".repeat(32));
        assert_eq!(
            key.sign(&hash, 8217u64).unwrap(),
            key.sign(&hash, 8217u64).unwrap()
        );
    }

    #[test]
    fn test_clone_shares_key_material() {
        let key = PrivateKey::generate();
        let clone = key.clone();
        assert!(key.ptr_eq(&clone));

        let reparsed = PrivateKey::from_hex(&key.to_hex()).unwrap();
        assert!(!key.ptr_eq(&reparsed));
        assert_eq!(key, reparsed);
    }

    #[test]
    fn test_debug_redacts() {
        let key = PrivateKey::from_hex(KEY).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&KEY[2..]));
    }
}
