//! Core Klaytn types.
//!
//! This module contains the fundamental types used throughout the SDK:
//! account addresses and chain ids.

mod address;
mod chain_id;

pub use address::{ADDRESS_LENGTH, Address};
pub use chain_id::{ChainId, IntoChainId};
