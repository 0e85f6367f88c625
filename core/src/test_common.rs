//! # Common Test Utilities
//!
//! This file includes common functions/variables for tests.
//!
//! Why is this file is here? If it is in `tests` subdirectory, unit tests can't
//! reach them.

use crate::builder::transaction::Utxo;
use bitcoin::Amount;

pub const REFERENCE_PUBKEY: &str =
    "0242f9da15eae56fe6aca65136738905c0afdb2c4edf379e107b3b00b98c7fc9f0";
pub const REFERENCE_TAG: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
pub const REFERENCE_TXID: &str = "4604a462372fc7f838e8e746685b53bdae1222e44be4601456c7e2882074028c";
pub const REFERENCE_DEST: &str = "tb1qd4erjn4tvt52c92yv66lwju9pzsd2ltph0xe5s";
pub const REFERENCE_CHANGE: &str = "tb1q5dgehs94wf5mgfasnfjsh4dqv6hz8e35w4w7tk";

/// P2WSH address of the reference script on testnet.
pub const REFERENCE_SCRIPT_ADDRESS: &str =
    "tb1q7eag20gm5vu6rguwc4hhq8d2jmpude8dhk9z3f0ztrw95nexdnfsppgh6h";

/// Secret key `0x11..11` and its compressed public key.
pub const TEST_SECRET_KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";
pub const TEST_PUBKEY: &str = "034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa";

pub fn reference_utxo(amount: u64) -> Utxo {
    Utxo {
        txid: REFERENCE_TXID.to_string(),
        vout: 0,
        amount: Amount::from_sat(amount),
    }
}
