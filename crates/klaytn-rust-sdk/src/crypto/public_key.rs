//! Secp256k1 public keys.

use crate::crypto::keccak256;
use crate::error::{KlaytnError, KlaytnResult};
use crate::types::Address;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of an uncompressed public key without the SEC1 `04` tag (x || y).
pub const PUBLIC_KEY_LENGTH: usize = 64;
/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// A secp256k1 public key.
///
/// The canonical string form is `0x` followed by 128 hex characters: the
/// uncompressed point `x || y` without the SEC1 `04` tag.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(inner: VerifyingKey) -> Self {
        Self { inner }
    }

    /// Creates a public key from bytes.
    ///
    /// Accepts a compressed SEC1 point (33 bytes), an uncompressed SEC1 point
    /// (65 bytes) or a bare `x || y` pair (64 bytes).
    pub fn from_bytes(bytes: &[u8]) -> KlaytnResult<Self> {
        let verifying_key = if bytes.len() == PUBLIC_KEY_LENGTH {
            let mut tagged = [0u8; PUBLIC_KEY_LENGTH + 1];
            tagged[0] = 0x04;
            tagged[1..].copy_from_slice(bytes);
            VerifyingKey::from_sec1_bytes(&tagged)
        } else {
            VerifyingKey::from_sec1_bytes(bytes)
        }
        .map_err(|e| KlaytnError::InvalidPublicKey(e.to_string()))?;
        Ok(Self {
            inner: verifying_key,
        })
    }

    /// Creates a public key from a hex string (with or without `0x` prefix).
    pub fn from_hex(hex_str: &str) -> KlaytnResult<Self> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes =
            hex::decode(hex_str).map_err(|e| KlaytnError::InvalidPublicKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the public key as `x || y` (64 bytes).
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let point = self.inner.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        bytes
    }

    /// Returns the public key as compressed SEC1 bytes (33 bytes).
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        self.inner.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Returns the canonical `0x` + 128 hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Returns the compressed `0x02...`/`0x03...` form.
    pub fn to_compressed_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_compressed_bytes()))
    }

    /// Derives the Klaytn address: the last 20 bytes of `keccak256(x || y)`.
    pub fn to_address(&self) -> Address {
        let hash = keccak256(&self.to_bytes());
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Address::new(address)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
