//! Recoverable ECDSA signature data.
//!
//! Klaytn signatures carry a `v` value from which the signer's public key
//! can be recovered. Transaction signatures bind the chain id into `v`
//! (`v = recovery_id + chain_id * 2 + 35`); message signatures do not
//! (`v = recovery_id + 27`).

use crate::crypto::PublicKey;
use crate::error::{KlaytnError, KlaytnResult};
use crate::types::ChainId;
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The `v` offset for message signatures.
pub const MESSAGE_V_OFFSET: u64 = 27;

/// The `v` offset for chain-id-bound transaction signatures.
pub const TRANSACTION_V_OFFSET: u64 = 35;

/// A `(v, r, s)` signature triple.
///
/// Serialized to JSON as an array of three `0x`-prefixed hex strings,
/// `[v, r, s]`, where `v` is padded to an even number of hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureData {
    v: u64,
    r: [u8; 32],
    s: [u8; 32],
}

impl SignatureData {
    /// Creates signature data from its components.
    pub const fn new(v: u64, r: [u8; 32], s: [u8; 32]) -> Self {
        Self { v, r, s }
    }

    pub(crate) fn from_recoverable(signature: &K256Signature, recid: RecoveryId, offset: u64) -> Self {
        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self {
            v: u64::from(recid.to_byte()) + offset,
            r,
            s,
        }
    }

    /// Returns `v`.
    pub fn v(&self) -> u64 {
        self.v
    }

    /// Returns `r` as big-endian bytes.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Returns `s` as big-endian bytes.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Returns `v` as a `0x`-prefixed hex string with an even digit count.
    pub fn v_hex(&self) -> String {
        let digits = format!("{:x}", self.v);
        if digits.len() % 2 == 1 {
            format!("0x0{digits}")
        } else {
            format!("0x{digits}")
        }
    }

    /// Returns `r` as a `0x`-prefixed hex string.
    pub fn r_hex(&self) -> String {
        format!("0x{}", hex::encode(self.r))
    }

    /// Returns `s` as a `0x`-prefixed hex string.
    pub fn s_hex(&self) -> String {
        format!("0x{}", hex::encode(self.s))
    }

    /// Extracts the recovery id, given the chain id the signature was made
    /// for (`None` for message signatures).
    pub fn recovery_id(&self, chain_id: Option<ChainId>) -> KlaytnResult<RecoveryId> {
        let offset = match chain_id {
            Some(chain_id) => chain_id
                .id()
                .checked_mul(2)
                .and_then(|doubled| doubled.checked_add(TRANSACTION_V_OFFSET))
                .ok_or_else(|| KlaytnError::InvalidChainId(chain_id.to_string()))?,
            None => MESSAGE_V_OFFSET,
        };
        let recid = self
            .v
            .checked_sub(offset)
            .and_then(|id| u8::try_from(id).ok())
            .and_then(RecoveryId::from_byte)
            .ok_or_else(|| {
                KlaytnError::InvalidSignature(format!("v {} does not encode a recovery id", self.v))
            })?;
        Ok(recid)
    }

    /// Recovers the public key that produced this signature over `digest`.
    pub fn recover_public_key(
        &self,
        digest: &[u8; 32],
        chain_id: Option<ChainId>,
    ) -> KlaytnResult<PublicKey> {
        let recid = self.recovery_id(chain_id)?;
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        let signature = K256Signature::from_slice(&bytes)
            .map_err(|e| KlaytnError::InvalidSignature(e.to_string()))?;
        let verifying_key = VerifyingKey::recover_from_prehash(digest, &signature, recid)
            .map_err(|e| KlaytnError::InvalidSignature(e.to_string()))?;
        Ok(PublicKey::from_verifying_key(verifying_key))
    }

    fn parse_word(hex_str: &str) -> KlaytnResult<[u8; 32]> {
        let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(digits)?;
        if bytes.len() > 32 {
            return Err(KlaytnError::InvalidSignature(format!(
                "expected at most 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut word = [0u8; 32];
        word[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(word)
    }

    /// Parses signature data from its three hex components.
    pub fn from_hex_parts(v: &str, r: &str, s: &str) -> KlaytnResult<Self> {
        let v_digits = v.strip_prefix("0x").unwrap_or(v);
        let v = u64::from_str_radix(v_digits, 16)
            .map_err(|e| KlaytnError::InvalidSignature(format!("invalid v: {e}")))?;
        Ok(Self {
            v,
            r: Self::parse_word(r)?,
            s: Self::parse_word(s)?,
        })
    }
}

impl fmt::Debug for SignatureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignatureData({}, {}, {})",
            self.v_hex(),
            self.r_hex(),
            self.s_hex()
        )
    }
}

impl Serialize for SignatureData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.v_hex())?;
        tuple.serialize_element(&self.r_hex())?;
        tuple.serialize_element(&self.s_hex())?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for SignatureData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SignatureVisitor;

        impl<'de> Visitor<'de> for SignatureVisitor {
            type Value = SignatureData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of three hex strings [v, r, s]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<SignatureData, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let v: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let r: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let s: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                SignatureData::from_hex_parts(&v, &r, &s).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_tuple(3, SignatureVisitor)
    }
}
