//! Hash functions for the Klaytn SDK.
//!
//! Klaytn uses Keccak-256 for transaction hashes, address derivation,
//! keystore MACs and the signed-message prefix scheme.

use crate::error::{KlaytnError, KlaytnResult};
use sha3::{Digest, Keccak256};

/// The prefix prepended to messages before hashing them for signing.
pub const MESSAGE_PREFIX: &str = "\x19Klaytn Signed Message:\n";

/// Computes the Keccak-256 hash of the input.
///
/// # Example
///
/// ```rust
/// use klaytn_rust_sdk::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Computes the Keccak-256 hash of multiple byte slices.
pub fn keccak256_of<I, T>(items: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Keccak256::new();
    for item in items {
        hasher.update(item.as_ref());
    }
    hasher.finalize().into()
}

/// Returns the bytes a message string stands for.
///
/// A string matching `0[xX][0-9a-fA-F]*` is taken as the bytes it encodes:
/// `"0x"` alone is the empty message and an odd number of digits gets a
/// leading zero nibble. Any other string is taken as its UTF-8 bytes.
pub fn message_bytes(message: &str) -> Vec<u8> {
    let digits = message
        .strip_prefix("0x")
        .or_else(|| message.strip_prefix("0X"));
    match digits {
        Some(digits) if digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            let padded = if digits.len() % 2 == 1 {
                format!("0{digits}")
            } else {
                digits.to_string()
            };
            hex::decode(padded).unwrap_or_else(|_| message.as_bytes().to_vec())
        }
        _ => message.as_bytes().to_vec(),
    }
}

/// Computes the digest signed for an off-chain message:
/// `keccak256("\x19Klaytn Signed Message:\n" || len(message) || message)`.
pub fn hash_message_bytes(message: &[u8]) -> [u8; 32] {
    let prefix = format!("{MESSAGE_PREFIX}{}", message.len());
    keccak256_of([prefix.as_bytes(), message])
}

/// Computes the message digest for a message string and returns it as a
/// `0x`-prefixed hex string.
pub fn hash_message(message: &str) -> String {
    format!("0x{}", hex::encode(hash_message_bytes(&message_bytes(message))))
}

/// Parses a `0x`-prefixed 32-byte hex digest.
pub fn parse_hash(hash: &str) -> KlaytnResult<[u8; 32]> {
    let digits = hash
        .strip_prefix("0x")
        .filter(|d| d.len() == 64 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| KlaytnError::InvalidHashFormat(hash.to_string()))?;
    let mut digest = [0u8; 32];
    hex::decode_to_slice(digits, &mut digest)
        .map_err(|_| KlaytnError::InvalidHashFormat(hash.to_string()))?;
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_known_value() {
        let hash = keccak256(b"hello world");
        assert_eq!(
            hex::encode(hash),
            "47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad"
        );
    }

    #[test]
    fn test_keccak256_of_multiple() {
        let hash1 = keccak256(b"helloworld");
        let hash2 = keccak256_of([b"hello".as_slice(), b"world".as_slice()]);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_message_bytes() {
        assert_eq!(message_bytes("0x0102"), vec![1u8, 2]);
        assert_eq!(message_bytes("hello"), b"hello".to_vec());
        // Not valid hex, so taken literally
        assert_eq!(message_bytes("0xzz"), b"0xzz".to_vec());
        assert_eq!(message_bytes("0X0102"), vec![1u8, 2]);
        assert_eq!(message_bytes("0xABcd"), vec![0xab, 0xcd]);
    }

    #[test]
    fn test_message_bytes_edge_hex() {
        assert!(message_bytes("0x").is_empty());
        assert_eq!(
            hash_message("0x"),
            format!("0x{}", hex::encode(hash_message_bytes(&[])))
        );
        assert_eq!(message_bytes("0x102"), vec![0x01, 0x02]);
        assert_eq!(hash_message("0xf"), hash_message("0x0f"));
    }

    #[test]
    fn test_hash_message_uses_prefix() {
        let expected = keccak256(b"\x19Klaytn Signed Message:\n5hello");
        assert_eq!(hash_message("hello"), format!("0x{}", hex::encode(expected)));
    }

    #[test]
    fn test_parse_hash() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_hash(&hash).unwrap(), [0xab; 32]);

        let bad = vec![
            String::new(),
            "0x".to_string(),
            "ab".repeat(32),
            "0x1234".to_string(),
            format!("0x{}", "zz".repeat(32)),
        ];
        for hash in &bad {
            assert!(matches!(
                parse_hash(hash),
                Err(KlaytnError::InvalidHashFormat(_))
            ));
        }
    }

    #[test]
    fn test_hash_message_hex_equals_utf8() {
        assert_eq!(hash_message("0x68656c6c6f"), hash_message("hello"));
    }
}
