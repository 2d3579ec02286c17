//! Error types for the Klaytn SDK.
//!
//! This module provides a unified error type [`KlaytnError`] that encompasses
//! all possible errors that can occur when managing keyrings, signing and
//! handling keystores.

use thiserror::Error;

/// A specialized Result type for Klaytn SDK operations.
pub type KlaytnResult<T> = Result<T, KlaytnError>;

/// The main error type for the Klaytn SDK.
///
/// Every validation failure is raised before any cryptographic work takes
/// place, so an error never leaves a partially signed result behind.
#[derive(Error, Debug)]
pub enum KlaytnError {
    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed private key string
    #[error("Invalid private key format: {0}")]
    InvalidKeyFormat(String),

    /// Key material was not supplied in the list shape the keyring expects
    #[error("Invalid key list format: {0}")]
    InvalidKeyListFormat(String),

    /// Invalid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid signature
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// A role was required but not supplied
    #[error("role should be defined")]
    RoleRequired,

    /// The role index is outside the key role table
    #[error("Invalid role index: {role}. The role index should be less than {role_last}")]
    InvalidRole {
        /// The rejected role index
        role: usize,
        /// The upper bound of valid role indices
        role_last: usize,
    },

    /// A role-based lookup found no key for the role nor for the default role
    #[error("The key with role {role} does not exist, and the default transaction role is also empty")]
    RoleKeyMissing {
        /// The requested role index
        role: usize,
    },

    /// An index does not address a key in the resolved key list
    #[error("Invalid index({index}): index must be less than the length of keys({length})")]
    IndexOutOfRange {
        /// The rejected index
        index: usize,
        /// The length of the key list
        length: usize,
    },

    /// The hash to sign is not a `0x`-prefixed 32-byte hex digest
    #[error("Invalid transaction hash: {0}")]
    InvalidHashFormat(String),

    /// The chain id is not a non-negative integer
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    /// Default-role signing was attempted with no key available
    #[error("Default key does not exist")]
    NoDefaultKey,

    /// Exactly one of role and index was supplied
    #[error("To sign the given message, both role and index must be defined")]
    IncompleteSigningParams,

    /// Options were supplied in a shape this keyring variant does not accept
    #[error("Invalid options shape: {0}")]
    InvalidOptionsShape(String),

    /// Threshold and weights do not describe a valid weighted multisig key
    #[error("Invalid weighted multisig options: {0}")]
    InvalidWeightedMultiSigOptions(String),

    /// The keystore uses a key derivation function this SDK does not implement
    #[error("Unsupported kdf: {0}")]
    UnsupportedKdf(String),

    /// The keystore uses a cipher this SDK does not implement
    #[error("Unsupported cipher: {0}")]
    UnsupportedCipher(String),

    /// The keystore version is neither 3 nor 4
    #[error("Unsupported keystore version: {0}")]
    UnsupportedKeystoreVersion(u32),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// The keystore is structurally invalid
    #[error("Invalid keystore: {0}")]
    InvalidKeystore(String),

    /// The keystore MAC did not match
    #[error("Key derivation failed - possibly wrong password")]
    MacMismatch,

    /// Internal SDK error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Maximum length for error messages to prevent excessive memory usage in logs.
const MAX_ERROR_MESSAGE_LENGTH: usize = 1000;

/// Patterns that might indicate sensitive information in error messages.
const SENSITIVE_PATTERNS: &[&str] = &["private_key", "privatekey", "secret", "password", "seed"];

impl KlaytnError {
    /// Creates a new invalid key format error
    pub fn invalid_key<S: Into<String>>(msg: S) -> Self {
        Self::InvalidKeyFormat(msg.into())
    }

    /// Creates a new invalid keystore error
    pub fn keystore<S: Into<String>>(msg: S) -> Self {
        Self::InvalidKeystore(msg.into())
    }

    /// Creates a new invalid role error for the given role index
    pub fn invalid_role(role: usize) -> Self {
        Self::InvalidRole {
            role,
            role_last: crate::keyring::ROLE_LAST,
        }
    }

    /// Returns true if this error was raised while validating signing input
    pub fn is_signing_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHashFormat(_)
                | Self::InvalidChainId(_)
                | Self::RoleRequired
                | Self::InvalidRole { .. }
                | Self::IndexOutOfRange { .. }
                | Self::IncompleteSigningParams
                | Self::NoDefaultKey
                | Self::RoleKeyMissing { .. }
        )
    }

    /// Returns true if this error indicates a wrong keystore password
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, Self::MacMismatch)
    }

    /// Returns a sanitized version of the error message safe for logging.
    ///
    /// Control characters are removed, very long messages are truncated and
    /// messages mentioning secrets are redacted entirely.
    pub fn sanitized_message(&self) -> String {
        let raw_message = self.to_string();
        Self::sanitize_string(&raw_message)
    }

    fn sanitize_string(s: &str) -> String {
        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();

        let lower = cleaned.to_lowercase();
        for pattern in SENSITIVE_PATTERNS {
            if lower.contains(pattern) {
                return format!("[REDACTED: message contained sensitive pattern '{pattern}']");
            }
        }

        if cleaned.len() > MAX_ERROR_MESSAGE_LENGTH {
            let mut end = MAX_ERROR_MESSAGE_LENGTH;
            while !cleaned.is_char_boundary(end) {
                end -= 1;
            }
            format!(
                "{}... [truncated, total length: {}]",
                &cleaned[..end],
                cleaned.len()
            )
        } else {
            cleaned
        }
    }

    /// Returns the error message suitable for display to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Json(_) => "Failed to process JSON",
            Self::Hex(_) => "Invalid hex format",
            Self::InvalidAddress(_) => "Invalid account address",
            Self::InvalidKeyFormat(_) => "Invalid private key",
            Self::InvalidKeyListFormat(_) => "Invalid key list",
            Self::InvalidPublicKey(_) => "Invalid public key",
            Self::InvalidSignature(_) => "Invalid signature",
            Self::RoleRequired => "Key role is required",
            Self::InvalidRole { .. } => "Invalid key role",
            Self::RoleKeyMissing { .. } => "No key for the requested role",
            Self::IndexOutOfRange { .. } => "Key index out of range",
            Self::InvalidHashFormat(_) => "Invalid hash",
            Self::InvalidChainId(_) => "Invalid chain id",
            Self::NoDefaultKey => "No default key",
            Self::IncompleteSigningParams => "Both role and index are required",
            Self::InvalidOptionsShape(_) => "Invalid options",
            Self::InvalidWeightedMultiSigOptions(_) => "Invalid multisig options",
            Self::UnsupportedKdf(_) => "Unsupported key derivation function",
            Self::UnsupportedCipher(_) => "Unsupported cipher",
            Self::UnsupportedKeystoreVersion(_) => "Unsupported keystore version",
            Self::KeyDerivation(_) => "Key derivation failed",
            Self::InvalidKeystore(_) => "Invalid keystore",
            Self::MacMismatch => "Wrong password",
            Self::Internal(_) => "Internal error",
            Self::Other(_) => "An error occurred",
        }
    }
}
