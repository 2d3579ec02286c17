//! Cryptographic primitives for the Klaytn SDK.
//!
//! Klaytn accounts use ECDSA over secp256k1 with Keccak-256 hashing.
//! Signatures are recoverable: the `v` value of a [`SignatureData`] lets a
//! verifier recover the signer's [`PublicKey`].
//!
//! # Example
//!
//! ```rust
//! use klaytn_rust_sdk::crypto::{hash_message, parse_hash, PrivateKey};
//!
//! let private_key = PrivateKey::generate();
//! let message_hash = hash_message("hello world");
//! let signature = private_key.sign_message(&message_hash).unwrap();
//!
//! let digest = parse_hash(&message_hash).unwrap();
//! let recovered = signature.recover_public_key(&digest, None).unwrap();
//! assert_eq!(recovered, private_key.public_key());
//! ```

mod hash;
mod private_key;
mod public_key;
mod signature;

pub use hash::{
    hash_message, hash_message_bytes, keccak256, keccak256_of, message_bytes, parse_hash,
    MESSAGE_PREFIX,
};
pub use private_key::{PrivateKey, PRIVATE_KEY_LENGTH};
pub use public_key::{PublicKey, COMPRESSED_PUBLIC_KEY_LENGTH, PUBLIC_KEY_LENGTH};
pub use signature::{SignatureData, MESSAGE_V_OFFSET, TRANSACTION_V_OFFSET};
