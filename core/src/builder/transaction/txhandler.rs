use crate::constants::DEFAULT_SEQUENCE;
use crate::errors::SpendError;
use bitcoin::sighash::SighashCache;
use bitcoin::transaction::Version;
use bitcoin::{absolute, EcdsaSighashType, SegwitV0Sighash, Sequence, Transaction, TxOut, Txid};
use bitcoin::{Script, Witness};

use super::input::{SpendableTxIn, SpentTxIn};

#[derive(Debug, Clone)]
pub struct TxHandler {
    txins: Vec<SpentTxIn>,
    txouts: Vec<TxOut>,

    /// Cached and immutable, same as other fields
    cached_tx: bitcoin::Transaction,
    cached_txid: bitcoin::Txid,
}

impl TxHandler {
    pub fn get_cached_tx(&self) -> &Transaction {
        &self.cached_tx
    }

    pub fn get_txid(&self) -> &Txid {
        &self.cached_txid
    }

    pub fn get_txouts(&self) -> &[TxOut] {
        &self.txouts
    }

    /// Computes the segwit v0 (BIP143) digest of input `txin_index`, using its
    /// witness script as script code and the value of the spent output.
    pub fn calculate_p2wsh_sighash(
        &self,
        txin_index: usize,
        sighash_type: EcdsaSighashType,
    ) -> Result<SegwitV0Sighash, SpendError> {
        let spendable = self
            .txins
            .get(txin_index)
            .ok_or(SpendError::TxInputNotFound)?
            .get_spendable();
        let witness_script = spendable.get_witness_script();

        check_script_parses(witness_script)?;

        let mut sighash_cache: SighashCache<&bitcoin::Transaction> =
            SighashCache::new(&self.cached_tx);
        let sig_hash = sighash_cache
            .p2wsh_signature_hash(
                txin_index,
                witness_script,
                spendable.get_prevout().value,
                sighash_type,
            )
            .map_err(|e| SpendError::DigestComputationFailed(e.to_string()))?;

        Ok(sig_hash)
    }
}

/// Witness stack for a P2WSH spend, the script is always the last element.
pub fn p2wsh_witness<T: AsRef<[u8]>>(script_inputs: &[T], witness_script: &Script) -> Witness {
    let mut witness = Witness::new();
    script_inputs
        .iter()
        .for_each(|element| witness.push(element));
    witness.push(witness_script.as_bytes());
    witness
}

/// Fails if `script` contains a truncated push or otherwise can't be split
/// into instructions.
fn check_script_parses(script: &Script) -> Result<(), SpendError> {
    if let Some(Err(e)) = script.instructions().find(|instruction| instruction.is_err()) {
        return Err(SpendError::DigestComputationFailed(format!(
            "malformed witness script: {e}"
        )));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct TxHandlerBuilder {
    version: Version,
    lock_time: absolute::LockTime,
    txins: Vec<SpentTxIn>,
    txouts: Vec<TxOut>,
}

impl Default for TxHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TxHandlerBuilder {
    pub fn new() -> TxHandlerBuilder {
        TxHandlerBuilder {
            version: Version::TWO,
            lock_time: absolute::LockTime::ZERO,
            txins: vec![],
            txouts: vec![],
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn add_input(mut self, spendable: SpendableTxIn, sequence: Sequence) -> Self {
        self.txins
            .push(SpentTxIn::from_spendable(spendable, sequence));

        self
    }

    pub fn add_default_input(self, spendable: SpendableTxIn) -> Self {
        self.add_input(spendable, DEFAULT_SEQUENCE)
    }

    pub fn add_output(mut self, output: TxOut) -> Self {
        self.txouts.push(output);

        self
    }

    pub fn finalize(self) -> TxHandler {
        // construct cached Transaction
        let tx = Transaction {
            version: self.version,
            lock_time: self.lock_time,
            input: self.txins.iter().map(|s| s.to_txin()).collect(),
            output: self.txouts.clone(),
        };
        let txid = tx.compute_txid();
        TxHandler {
            txins: self.txins,
            txouts: self.txouts,
            cached_tx: tx,
            cached_txid: txid,
        }
    }
}
