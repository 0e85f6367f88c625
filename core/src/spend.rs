//! # Spend Pipeline
//!
//! Runs the whole tag-commit spend for one configuration:
//!
//! 1. Build the locking script and derive its P2WSH address
//! 2. Build the spend transaction and its digest
//! 3. Either hand the digest off for external signing ([`SpendMode::Prepare`])
//!    or sign with a key from the host and finalize ([`SpendMode::Sign`])
//!
//! Everything the pipeline needs from its environment goes through [`Host`].

use crate::actor::{LocalSigner, Signer};
use crate::builder::address::create_tag_commit_address;
use crate::builder::transaction::{create_spend_txhandler, finalize};
use crate::config::SpendConfig;
use crate::errors::SpendError;
use crate::handoff::SigningHandoff;
use crate::utils::sighash_hex;
use bitcoin::secp256k1::PublicKey;
use secrecy::SecretString;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpendMode {
    /// Build the transaction and return a [`SigningHandoff`] as JSON.
    Prepare,
    /// Sign with the host's key and return the finalized transaction hex.
    Sign,
}

/// Capabilities provided by whatever runs the pipeline.
pub trait Host {
    fn log(&self, message: &str);

    /// Stops execution with `reason`. Never returns.
    fn abort(&self, reason: &str) -> !;

    fn get_secret(&self, name: &str) -> Option<SecretString>;
}

/// Host for a plain process: logs through `tracing`, exits on abort and reads
/// secrets from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvHost;

impl Host for EnvHost {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn abort(&self, reason: &str) -> ! {
        tracing::error!("Aborting: {reason}");
        eprintln!("{reason}");
        std::process::exit(1);
    }

    fn get_secret(&self, name: &str) -> Option<SecretString> {
        std::env::var(name).ok().map(SecretString::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendOutput {
    Handoff(SigningHandoff),
    /// Finalized transaction, segwit encoded, hex.
    SignedTx(String),
}

impl SpendOutput {
    /// The string handed back to the host.
    pub fn render(&self) -> Result<String, SpendError> {
        match self {
            SpendOutput::Handoff(handoff) => handoff.to_json(),
            SpendOutput::SignedTx(raw_tx_hex) => Ok(raw_tx_hex.clone()),
        }
    }
}

/// Runs the pipeline and returns its artifact, or the first error.
///
/// `payload` is only logged in sign mode and otherwise ignored.
pub fn try_spend<H: Host + ?Sized>(
    host: &H,
    config: &SpendConfig,
    mode: SpendMode,
    payload: &str,
) -> Result<SpendOutput, SpendError> {
    if mode == SpendMode::Sign {
        host.log(&format!("Payload: {payload}"));
    }

    let (address, redeem_script) =
        create_tag_commit_address(&config.pubkey, &config.tag, config.network)?;
    if mode == SpendMode::Sign {
        host.log(&format!("Script address: {address}"));
    }

    let (txhandler, sighash) = create_spend_txhandler(
        &config.utxo,
        &redeem_script,
        &config.dest_address,
        &config.change_address,
        config.send_amount,
        config.fee_amount,
        config.network,
        config.tx_options(),
    )?;

    match mode {
        SpendMode::Prepare => {
            tracing::info!(
                txid = %txhandler.get_txid(),
                "Prepared spend transaction for external signing"
            );

            Ok(SpendOutput::Handoff(SigningHandoff::new(
                &txhandler,
                &sighash,
                &redeem_script,
            )))
        }
        SpendMode::Sign => {
            host.log(&format!("Sighash: {}", sighash_hex(&sighash)));

            let signer = LocalSigner::from_secret(
                &config.secret_name,
                host.get_secret(&config.secret_name),
            )?;
            if PublicKey::from_str(config.pubkey.trim()).ok() != Some(signer.public_key()) {
                tracing::warn!(
                    signer = %signer.public_key(),
                    "Signing key does not match the key in the script, the spend will not validate"
                );
            }

            let signature = signer.sign(sighash)?;
            drop(signer);

            let raw_tx_hex = hex::encode(finalize(
                txhandler.get_cached_tx(),
                &signature,
                &redeem_script,
            )?);

            host.log(&format!("Signed transaction: {raw_tx_hex}"));

            Ok(SpendOutput::SignedTx(raw_tx_hex))
        }
    }
}

/// Single entry point for hosts. Returns the rendered artifact; on any error
/// the host is asked to abort and nothing partial is returned.
pub fn spend<H: Host + ?Sized>(
    host: &H,
    config: &SpendConfig,
    mode: SpendMode,
    payload: &str,
) -> String {
    match try_spend(host, config, mode, payload).and_then(|output| output.render()) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "Spend failed: {e}");
            host.abort(&e.to_string())
        }
    }
}
