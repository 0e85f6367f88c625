//! # Signing Handoff
//!
//! Prepare mode does not sign. It hands the unsigned transaction, the digest
//! and the witness script to an external signer as a [`SigningHandoff`], and
//! whoever holds the key completes the spend with
//! [`SigningHandoff::finalize`].

use crate::builder::transaction::{finalize_tx, parse_transaction, serialize_unsigned, TxHandler};
use crate::constants::SPEND_INPUT_INDEX;
use crate::errors::SpendError;
use crate::utils::{decode_hex, sighash_hex, SECP};
use bitcoin::secp256k1::{Message, PublicKey};
use bitcoin::{ecdsa, ScriptBuf, SegwitV0Sighash, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningHandoff {
    /// Unsigned transaction, consensus encoded without witness.
    #[serde(rename = "RawTxHex")]
    pub raw_tx_hex: String,
    #[serde(rename = "InputIndex")]
    pub input_index: usize,
    /// BIP143 digest in the byte order it is signed.
    #[serde(rename = "SigHashHex")]
    pub sighash_hex: String,
    #[serde(rename = "RedeemScriptHex")]
    pub redeem_script_hex: String,
}

impl SigningHandoff {
    pub fn new(
        txhandler: &TxHandler,
        sighash: &SegwitV0Sighash,
        redeem_script: &ScriptBuf,
    ) -> Self {
        SigningHandoff {
            raw_tx_hex: hex::encode(serialize_unsigned(txhandler.get_cached_tx())),
            input_index: SPEND_INPUT_INDEX,
            sighash_hex: sighash_hex(sighash),
            redeem_script_hex: hex::encode(redeem_script.as_bytes()),
        }
    }

    pub fn to_json(&self) -> Result<String, SpendError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SpendError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Attaches an externally produced `signature` to the handed off
    /// transaction and returns it with the witness `[signature, script]`.
    ///
    /// If `pubkey` is given, the signature is checked against it and the
    /// handed off digest first.
    pub fn finalize(
        &self,
        signature: &ecdsa::Signature,
        pubkey: Option<&PublicKey>,
    ) -> Result<Transaction, SpendError> {
        if self.input_index != SPEND_INPUT_INDEX {
            return Err(SpendError::TxInputNotFound);
        }

        let tx = parse_transaction(&decode_hex("RawTxHex", &self.raw_tx_hex)?)?;
        let redeem_script =
            ScriptBuf::from_bytes(decode_hex("RedeemScriptHex", &self.redeem_script_hex)?);

        if let Some(pubkey) = pubkey {
            let digest: [u8; 32] = decode_hex("SigHashHex", &self.sighash_hex)?
                .try_into()
                .map_err(|bytes: Vec<u8>| {
                    SpendError::InvalidEncoding(format!(
                        "SigHashHex: expected 32 bytes, got {}",
                        bytes.len()
                    ))
                })?;
            SECP.verify_ecdsa(
                &Message::from_digest(digest),
                &signature.signature,
                pubkey,
            )?;
        }

        finalize_tx(&tx, signature, &redeem_script)
    }
}
