//! # builder::transaction
//!
//! This module assembles the transaction that spends a tag-commit UTXO and
//! computes the digest its signature has to cover.
//!
//! ## Main Components
//!
//! - [`mod.rs`] - [`create_spend_txhandler`], plus the free functions that
//!   serialize, finalize and parse spend transactions.
//! - [`txhandler.rs`] - Defines the [`TxHandler`] abstraction, which wraps an unsigned transaction and the outputs it spends, and computes its sighash.
//! - [`input.rs`] - Defines types and utilities for transaction inputs used in the [`TxHandler`].
//! - [`output.rs`] - Output helpers and the dust rule.
//!
//! The digest is computed only after every output is in place. Changing an
//! output, the witness script or the spent amount afterwards invalidates it.

use crate::builder::address::{decode_address, decode_change_address, ChangeNetworkPolicy};
use crate::constants::{DEFAULT_TX_VERSION, SPEND_INPUT_INDEX, SPEND_SIGHASH_TYPE};
use crate::errors::SpendError;
use crate::utils::sighash_hex;
use bitcoin::consensus::encode::{deserialize, serialize};
use bitcoin::transaction::Version;
use bitcoin::{ecdsa, Amount, Network, OutPoint, Script, ScriptBuf, SegwitV0Sighash};
use bitcoin::{Transaction, Txid, Witness};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use input::SpendableTxIn;

// Exports to the outside
pub use crate::builder::transaction::txhandler::*;

pub mod input;
pub mod output;
pub mod txhandler;

/// The coin being spent. `txid` is in the usual display (byte reversed) hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub amount: Amount,
}

impl Utxo {
    pub fn outpoint(&self) -> Result<OutPoint, SpendError> {
        let txid = Txid::from_str(&self.txid)
            .map_err(|e| SpendError::InvalidTxId(format!("{}: {e}", self.txid)))?;

        Ok(OutPoint::new(txid, self.vout))
    }
}

/// Knobs of the spend transaction that rarely change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendTxOptions {
    pub version: Version,
    pub change_policy: ChangeNetworkPolicy,
}

impl Default for SpendTxOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_TX_VERSION,
            change_policy: ChangeNetworkPolicy::default(),
        }
    }
}

/// Creates the unsigned transaction spending `utxo` and the digest of its
/// only input.
///
/// Output 0 pays `send_amount` to `dest_address`. What is left after
/// `fee_amount` goes to `change_address` as output 1 if it is above the dust
/// threshold, otherwise it is added to the fee and the change address is never
/// decoded.
///
/// # Returns
///
/// - [`TxHandler`]: Unsigned spend transaction
/// - [`SegwitV0Sighash`]: BIP143 digest of input 0 under `SIGHASH_ALL`
#[allow(clippy::too_many_arguments)]
pub fn create_spend_txhandler(
    utxo: &Utxo,
    redeem_script: &ScriptBuf,
    dest_address: &str,
    change_address: &str,
    send_amount: Amount,
    fee_amount: Amount,
    network: Network,
    options: SpendTxOptions,
) -> Result<(TxHandler, SegwitV0Sighash), SpendError> {
    let outpoint = utxo.outpoint()?;
    let spendable = SpendableTxIn::new(outpoint, utxo.amount, redeem_script.clone());

    let dest = decode_address(dest_address, network)
        .map_err(SpendError::InvalidDestinationAddress)?;

    let required = send_amount
        .checked_add(fee_amount)
        .filter(|required| *required <= utxo.amount)
        .ok_or(SpendError::InsufficientFunds {
            available: utxo.amount.to_sat(),
            required: send_amount.to_sat().saturating_add(fee_amount.to_sat()),
        })?;
    let change_amount = utxo.amount - required;

    let mut outputs = vec![(send_amount, dest.script_pubkey())];
    if output::is_above_dust(change_amount) {
        let change = decode_change_address(change_address, network, options.change_policy)?;
        outputs.push((change_amount, change.script_pubkey()));
    } else {
        tracing::debug!(
            %change_amount,
            "Change is dust, leaving it to the miner"
        );
    }

    let txhandler = output::create_tx_outs(outputs)
        .into_iter()
        .fold(
            TxHandlerBuilder::new()
                .with_version(options.version)
                .add_default_input(spendable),
            |builder, txout| builder.add_output(txout),
        )
        .finalize();

    let sighash = txhandler.calculate_p2wsh_sighash(SPEND_INPUT_INDEX, SPEND_SIGHASH_TYPE)?;

    tracing::debug!(
        txid = %txhandler.get_txid(),
        outputs = txhandler.get_txouts().len(),
        sighash = %sighash_hex(&sighash),
        "Created spend transaction"
    );

    Ok((txhandler, sighash))
}

/// Consensus encoding of `tx` with every witness left out.
pub fn serialize_unsigned(tx: &Transaction) -> Vec<u8> {
    let mut tx = tx.clone();
    tx.input
        .iter_mut()
        .for_each(|txin| txin.witness = Witness::new());

    serialize(&tx)
}

/// Sets the witness of input 0 to `[signature, redeem_script]` and returns the
/// segwit encoding of the result.
pub fn finalize(
    tx: &Transaction,
    signature: &ecdsa::Signature,
    redeem_script: &Script,
) -> Result<Vec<u8>, SpendError> {
    Ok(serialize(&finalize_tx(tx, signature, redeem_script)?))
}

/// Same as [`finalize`], but returns the transaction itself.
pub fn finalize_tx(
    tx: &Transaction,
    signature: &ecdsa::Signature,
    redeem_script: &Script,
) -> Result<Transaction, SpendError> {
    let mut tx = tx.clone();
    let txin = tx
        .input
        .get_mut(SPEND_INPUT_INDEX)
        .ok_or(SpendError::TxInputNotFound)?;

    if !txin.witness.is_empty() {
        return Err(SpendError::WitnessAlreadySet);
    }
    txin.witness = p2wsh_witness(&[signature.to_vec()], redeem_script);

    Ok(tx)
}

pub fn parse_transaction(bytes: &[u8]) -> Result<Transaction, SpendError> {
    Ok(deserialize(bytes)?)
}
