//! Account address type.
//!
//! Klaytn account addresses are 20-byte values, displayed as 40 lower-case
//! hexadecimal characters with a `0x` prefix.

use crate::error::{KlaytnError, KlaytnResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// A 20-byte Klaytn account address.
///
/// Unlike Ethereum, a Klaytn address is not necessarily derived from the key
/// that controls it: an account can be "decoupled" from its key through an
/// account update.
///
/// # Example
///
/// ```rust
/// use klaytn_rust_sdk::Address;
///
/// let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
/// assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a hex string (with or without `0x` prefix).
    ///
    /// The string must hold exactly 40 hex digits. Mixed-case input must be
    /// a valid EIP-55 checksum; all-lower and all-upper input is accepted
    /// as is.
    pub fn from_hex(hex_str: &str) -> KlaytnResult<Self> {
        let digits = hex_str
            .strip_prefix("0x")
            .or_else(|| hex_str.strip_prefix("0X"))
            .unwrap_or(hex_str);

        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(KlaytnError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KlaytnError::InvalidAddress(format!(
                "invalid hex characters in {hex_str}"
            )));
        }

        let bytes =
            hex::decode(digits).map_err(|e| KlaytnError::InvalidAddress(e.to_string()))?;
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&bytes);
        let address = Self(address);

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(KlaytnError::InvalidAddress(format!(
                "checksum mismatch for {hex_str}"
            )));
        }

        Ok(address)
    }

    /// Creates an address from a byte slice.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> KlaytnResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(KlaytnError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the address as a lower-case hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns the EIP-55 mixed-case checksum encoding.
    pub fn to_checksum(&self) -> String {
        let hex_addr = hex::encode(self.0);
        let hash = Keccak256::digest(hex_addr.as_bytes());

        let mut result = String::with_capacity(ADDRESS_LENGTH * 2 + 2);
        result.push_str("0x");
        for (i, c) in hex_addr.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
        }
        result
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = KlaytnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; ADDRESS_LENGTH] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
    const CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_from_hex() {
        let addr = Address::from_hex(LOWER).unwrap();
        assert_eq!(addr.to_hex(), LOWER);

        // Without prefix
        let addr = Address::from_hex(&LOWER[2..]).unwrap();
        assert_eq!(addr.to_hex(), LOWER);

        // Upper-case input carries no checksum
        let upper = format!("0x{}", LOWER[2..].to_uppercase());
        assert_eq!(Address::from_hex(&upper).unwrap().to_hex(), LOWER);
    }

    #[test]
    fn test_checksum() {
        let addr = Address::from_hex(LOWER).unwrap();
        assert_eq!(addr.to_checksum(), CHECKSUM);
        assert_eq!(Address::from_hex(CHECKSUM).unwrap(), addr);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let broken = CHECKSUM.replace("aA", "Aa");
        assert!(matches!(
            Address::from_hex(&broken),
            Err(KlaytnError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Address::from_hex("0x1").is_err());
        assert!(Address::from_hex("").is_err());
        assert!(Address::from_hex("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
    }

    #[test]
    fn test_json_serialization() {
        let addr = Address::from_hex(CHECKSUM).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{LOWER}\""));

        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_from_bytes() {
        let addr = Address::from_bytes([7u8; ADDRESS_LENGTH]).unwrap();
        assert_eq!(addr.to_bytes(), [7u8; ADDRESS_LENGTH]);
        assert!(Address::from_bytes([7u8; 32]).is_err());
    }

    #[test]
    fn test_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; ADDRESS_LENGTH]).is_zero());
    }

    #[test]
    fn test_display() {
        let addr = Address::from_hex(LOWER).unwrap();
        assert_eq!(format!("{addr}"), LOWER);
        assert!(format!("{addr:?}").contains("Address"));
    }
}
