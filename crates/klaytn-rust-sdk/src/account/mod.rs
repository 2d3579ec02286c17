//! Account descriptors for the Klaytn SDK.
//!
//! A Klaytn account's controlling key is decoupled from its address. An
//! [`Account`] pairs an address with the [`AccountKey`] it should hold and
//! is what a keyring produces when preparing an account-update transaction.
//!
//! # Account Keys
//!
//! - [`AccountKey::Legacy`] - the key derived from the address
//! - [`AccountKey::Public`] - one public key
//! - [`AccountKey::Fail`] - rejects every transaction
//! - [`AccountKey::WeightedMultiSig`] - threshold over weighted keys
//! - [`AccountKey::RoleBased`] - one key per role
//! - [`AccountKey::Nil`] - leaves a role unchanged
//!
//! # Example
//!
//! ```rust
//! use klaytn_rust_sdk::account::{Account, AccountKey, WeightedMultiSigOptions};
//! use klaytn_rust_sdk::crypto::PrivateKey;
//! use klaytn_rust_sdk::Address;
//!
//! let keys: Vec<_> = (0..3).map(|_| PrivateKey::generate().public_key()).collect();
//! let options = WeightedMultiSigOptions::new(2, vec![1, 1, 1]);
//! let account = Account::create_with_account_key_weighted_multi_sig(
//!     Address::ZERO,
//!     &keys,
//!     Some(&options),
//! )
//! .unwrap();
//! assert!(matches!(account.account_key(), AccountKey::WeightedMultiSig(_)));
//! ```

#[allow(clippy::module_inception)]
mod account;
mod account_key;
mod options;

pub use account::Account;
pub use account_key::{
    AccountKey, AccountKeyWeightedMultiSig, WeightedPublicKey, MAX_ACCOUNT_KEY_NUMBER,
};
pub use options::{
    fill_weighted_multi_sig_options_for_multi_sig, fill_weighted_multi_sig_options_for_role_based,
    AccountKeyOptions, WeightedMultiSigOptions,
};
