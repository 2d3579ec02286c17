//! # Klaytn Rust SDK
//!
//! Keyrings, signing and keystores for Klaytn-family networks.
//!
//! On Klaytn an account's key can be changed independently of its address,
//! and an account may hold several keys or a separate key list per role.
//! This SDK models that with keyrings: private keys bound to an address,
//! which sign transaction hashes and off-chain messages and export to
//! encrypted keystore JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use klaytn_rust_sdk::{AbstractKeyring, KeyringFactory, Network};
//! use klaytn_rust_sdk::keyring::KeyRole;
//!
//! let keyring = KeyringFactory::generate();
//! let hash = format!("0x{}", "12".repeat(32));
//!
//! let signature = keyring
//!     .sign_with_key(&hash, Network::Baobab, KeyRole::TRANSACTION, 0)
//!     .unwrap();
//! println!("v = {}, r = {}", signature.v_hex(), signature.r_hex());
//! ```
//!
//! ## Modules
//!
//! - [`keyring`] - Single, multiple and role-based keyrings and their signing operations
//! - [`keystore`] - Keystore v3/v4 encryption and decryption
//! - [`account`] - Account descriptors derived from keyrings
//! - [`crypto`] - Private keys, public keys, hashing and signatures
//! - [`config`] - Network presets and keystore settings
//! - [`types`] - Addresses and chain ids

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod account;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keyring;
pub mod keystore;
pub mod types;

pub use config::{KlaytnConfig, Network};
pub use error::{KlaytnError, KlaytnResult};
pub use keyring::{AbstractKeyring, Keyring, KeyringFactory};

pub use types::{Address, ChainId, IntoChainId};
