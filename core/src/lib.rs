//! # Tagspend Core
//!
//! Builds and signs transactions spending P2WSH outputs locked by a
//! tag-commit script, `<pubkey> OP_CHECKSIGVERIFY <tag>`.
//!
//! [`spend::spend`] is the single entry point. It either returns a
//! [`handoff::SigningHandoff`] for an external signer or signs with a key
//! provided by the [`spend::Host`] and returns the finalized transaction.

pub mod actor;
pub mod builder;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod handoff;
pub mod spend;
pub mod utils;

#[cfg(test)]
mod test_common;

pub use errors::{ErrorKind, SpendError};
pub use spend::{spend, try_spend, EnvHost, Host, SpendMode, SpendOutput};
