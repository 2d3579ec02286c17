//! Validation and key formatting shared by all keyring variants.

use crate::crypto::{parse_hash, PrivateKey};
use crate::error::{KlaytnError, KlaytnResult};
use crate::keyring::ROLE_LAST;
use crate::types::{ChainId, IntoChainId};
use serde_json::Value;

/// Validates the inputs of a transaction-hash signing request.
///
/// Returns the parsed digest and chain id.
///
/// # Errors
///
/// - [`KlaytnError::InvalidHashFormat`] unless the hash is `0x` + 64 hex characters
/// - [`KlaytnError::InvalidChainId`] unless the chain id is a non-negative
///   integer or a numeric string
pub fn validate_for_signing(
    hash: &str,
    chain_id: impl IntoChainId,
) -> KlaytnResult<([u8; 32], ChainId)> {
    let digest = parse_hash(hash)?;
    let chain_id = chain_id.into_chain_id()?;
    Ok((digest, chain_id))
}

/// Checks that `index` addresses a key in a list of `length` keys.
pub fn validate_index_with_keys(index: usize, length: usize) -> KlaytnResult<()> {
    if index >= length {
        return Err(KlaytnError::IndexOutOfRange { index, length });
    }
    Ok(())
}

/// A private key given either as a parsed key or as a hex string.
#[derive(Clone, Debug)]
pub enum KeyInput {
    /// An existing key, used as is
    Key(PrivateKey),
    /// A hex string, parsed into a new key
    Hex(String),
}

impl From<PrivateKey> for KeyInput {
    fn from(key: PrivateKey) -> Self {
        Self::Key(key)
    }
}

impl From<&PrivateKey> for KeyInput {
    fn from(key: &PrivateKey) -> Self {
        Self::Key(key.clone())
    }
}

impl From<String> for KeyInput {
    fn from(key: String) -> Self {
        Self::Hex(key)
    }
}

impl From<&String> for KeyInput {
    fn from(key: &String) -> Self {
        Self::Hex(key.clone())
    }
}

impl From<&str> for KeyInput {
    fn from(key: &str) -> Self {
        Self::Hex(key.to_string())
    }
}

/// Normalizes a key input into a [`PrivateKey`].
///
/// A [`KeyInput::Key`] is returned as the same handle; a
/// [`KeyInput::Hex`] string is parsed into a new key.
pub fn format_key(key: impl Into<KeyInput>) -> KlaytnResult<PrivateKey> {
    match key.into() {
        KeyInput::Key(key) => Ok(key),
        KeyInput::Hex(hex) => PrivateKey::from_hex(&hex),
    }
}

/// Normalizes a sequence of key inputs, preserving order.
pub fn format_keys<I, K>(keys: I) -> KlaytnResult<Vec<PrivateKey>>
where
    I: IntoIterator<Item = K>,
    K: Into<KeyInput>,
{
    keys.into_iter().map(format_key).collect()
}

/// Raw key material, in the three shapes a keyring can be built from.
#[derive(Clone, Debug)]
pub enum KeyMaterial {
    /// One key
    Single(KeyInput),
    /// A flat key list
    Multiple(Vec<KeyInput>),
    /// One key list per role
    RoleBased(Vec<Vec<KeyInput>>),
}

impl KeyMaterial {
    /// Interprets a JSON value as key material.
    ///
    /// A string is a single key, an array of strings is a key list and an
    /// array of arrays of strings is a per-role key list.
    ///
    /// # Errors
    ///
    /// Returns [`KlaytnError::InvalidKeyListFormat`] for any other shape, or
    /// for more than [`ROLE_LAST`] role lists.
    pub fn from_json(value: &Value) -> KlaytnResult<Self> {
        match value {
            Value::String(key) => Ok(Self::Single(KeyInput::Hex(key.clone()))),
            Value::Array(items) if items.iter().all(Value::is_array) && !items.is_empty() => {
                if items.len() > ROLE_LAST {
                    return Err(KlaytnError::InvalidKeyListFormat(format!(
                        "expected at most {ROLE_LAST} role key lists, got {}",
                        items.len()
                    )));
                }
                items
                    .iter()
                    .map(|role| match role {
                        Value::Array(keys) => Self::string_list(keys),
                        _ => Err(Self::shape_error(role)),
                    })
                    .collect::<KlaytnResult<Vec<_>>>()
                    .map(Self::RoleBased)
            }
            Value::Array(items) => Self::string_list(items).map(Self::Multiple),
            other => Err(Self::shape_error(other)),
        }
    }

    fn string_list(items: &[Value]) -> KlaytnResult<Vec<KeyInput>> {
        items
            .iter()
            .map(|item| match item {
                Value::String(key) => Ok(KeyInput::Hex(key.clone())),
                other => Err(Self::shape_error(other)),
            })
            .collect()
    }

    fn shape_error(value: &Value) -> KlaytnError {
        let kind = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        KlaytnError::InvalidKeyListFormat(format!("unexpected {kind} in key material"))
    }
}

impl From<&str> for KeyMaterial {
    fn from(key: &str) -> Self {
        Self::Single(key.into())
    }
}

impl From<String> for KeyMaterial {
    fn from(key: String) -> Self {
        Self::Single(key.into())
    }
}

impl From<PrivateKey> for KeyMaterial {
    fn from(key: PrivateKey) -> Self {
        Self::Single(key.into())
    }
}

macro_rules! impl_key_material_from_lists {
    ($($key:ty),*) => {
        $(
            impl From<Vec<$key>> for KeyMaterial {
                fn from(keys: Vec<$key>) -> Self {
                    Self::Multiple(keys.into_iter().map(KeyInput::from).collect())
                }
            }

            impl From<Vec<Vec<$key>>> for KeyMaterial {
                fn from(role_keys: Vec<Vec<$key>>) -> Self {
                    Self::RoleBased(
                        role_keys
                            .into_iter()
                            .map(|keys| keys.into_iter().map(KeyInput::from).collect())
                            .collect(),
                    )
                }
            }
        )*
    };
}

impl_key_material_from_lists!(String, &str, PrivateKey, KeyInput);
