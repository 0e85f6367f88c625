use crate::constants::DUST_THRESHOLD;
use bitcoin::{Amount, ScriptBuf, TxOut};

/// Returns `true` when `change` is worth an output of its own. Anything at or
/// below [`DUST_THRESHOLD`] is left to the miner.
pub fn is_above_dust(change: Amount) -> bool {
    change > DUST_THRESHOLD
}

pub fn create_tx_outs(pairs: Vec<(Amount, ScriptBuf)>) -> Vec<TxOut> {
    pairs
        .into_iter()
        .map(|(value, script_pubkey)| TxOut {
            value,
            script_pubkey,
        })
        .collect()
}
