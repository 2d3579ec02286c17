//! Key roles.

use crate::error::{KlaytnError, KlaytnResult};
use std::fmt;

/// The number of roles; role indices must be below this value.
pub const ROLE_LAST: usize = 3;

/// Role names, by role index.
pub const KEY_ROLE: [&str; ROLE_LAST] = [
    "roleTransactionKey",
    "roleAccountUpdateKey",
    "roleFeePayerKey",
];

/// A key role index.
///
/// Values are not validated on construction so that out-of-range roles
/// supplied by callers surface as [`KlaytnError::InvalidRole`] at the
/// operation that uses them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyRole(usize);

impl KeyRole {
    /// Signs ordinary transactions.
    pub const TRANSACTION: Self = Self(0);
    /// Signs account-update transactions.
    pub const ACCOUNT_UPDATE: Self = Self(1);
    /// Signs as the fee payer of fee-delegated transactions.
    pub const FEE_PAYER: Self = Self(2);

    /// Creates a role from its index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the role index.
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Returns the role name, or `None` for an invalid role.
    pub fn name(&self) -> Option<&'static str> {
        KEY_ROLE.get(self.0).copied()
    }

    /// Returns the index if it addresses a role in [`KEY_ROLE`].
    pub fn validate(&self) -> KlaytnResult<usize> {
        if self.0 >= ROLE_LAST {
            return Err(KlaytnError::invalid_role(self.0));
        }
        Ok(self.0)
    }

    /// All valid roles, in index order.
    pub fn all() -> impl Iterator<Item = KeyRole> {
        (0..ROLE_LAST).map(KeyRole)
    }
}

impl From<usize> for KeyRole {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "role({})", self.0),
        }
    }
}

/// Resolves an optional role: absent is [`KlaytnError::RoleRequired`],
/// out of range is [`KlaytnError::InvalidRole`].
pub(crate) fn require_role(role: impl Into<Option<KeyRole>>) -> KlaytnResult<usize> {
    role.into().ok_or(KlaytnError::RoleRequired)?.validate()
}
