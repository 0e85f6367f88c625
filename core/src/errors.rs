//! # Errors
//!
//! This module defines errors, returned by the library.
//!
//! Every stage of the spend pipeline returns [`SpendError`]. Nothing is
//! recovered locally: errors travel up to [`crate::spend::spend`], which turns
//! them into a single host abort. [`SpendError::kind`] groups the variants
//! into the coarse categories callers usually branch on.

use core::fmt::Debug;
use thiserror::Error;

/// Coarse failure categories of the spend pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed hex, wrong-length hash, key or tag.
    Decode,
    /// Invalid address encoding or network mismatch.
    Address,
    /// The signing digest can't be computed, or the amounts don't add up.
    Digest,
    /// The signing operation or witness attachment failed.
    Signature,
    /// No private key is available for inline signing.
    MissingKeyMaterial,
    /// Configuration could not be read.
    Config,
}

/// Errors returned by the spend pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpendError {
    /// Returned when a hex input can't be decoded
    #[error("InvalidEncoding: {0}")]
    InvalidEncoding(String),
    #[error("FromHexError: {0}")]
    FromHexError(#[from] hex::FromHexError),
    /// Public key bytes are not a compressed secp256k1 point
    #[error("InvalidPublicKey: {0}")]
    InvalidPublicKey(String),
    #[error("Tag of {0} bytes exceeds the maximum script element size")]
    TagTooLarge(usize),
    #[error("AddressDerivationFailed: {0}")]
    AddressDerivationFailed(String),

    #[error("InvalidTxId: {0}")]
    InvalidTxId(String),
    #[error("InvalidDestinationAddress: {0}")]
    InvalidDestinationAddress(String),
    #[error("InvalidChangeAddress: {0}")]
    InvalidChangeAddress(String),
    /// Returned when send amount plus fee exceed the UTXO value
    #[error("InsufficientFunds: utxo holds {available} sats, {required} sats required")]
    InsufficientFunds { available: u64, required: u64 },
    #[error("DigestComputationFailed: {0}")]
    DigestComputationFailed(String),

    /// Returned when the bitcoin::secp256k1 crate returns an error
    #[error("Secp256k1Error: {0}")]
    Secp256k1Error(#[from] bitcoin::secp256k1::Error),
    #[error("SignatureError: {0}")]
    SignatureError(String),
    #[error("MissingKeyMaterial: secret {0} is not set")]
    MissingKeyMaterial(String),

    /// TxInputNotFound is returned when the input is not found in the transaction
    #[error("TxInputNotFound")]
    TxInputNotFound,
    #[error("WitnessAlreadySet")]
    WitnessAlreadySet,
    /// Returned when bitcoin::Transaction error happens, also returns the error
    #[error("BitcoinTransactionError: {0}")]
    BitcoinConsensusEncodeError(#[from] bitcoin::consensus::encode::Error),
    #[error("Can't de/serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// ConfigError is returned when the configuration is invalid
    #[error("ConfigError: {0}")]
    ConfigError(String),
    /// Returned when an environment variable can't be read
    #[error("Environment variable {1} is not set: {0}")]
    EnvVarNotSet(std::env::VarError, &'static str),
    #[error("Environment variable {0} is malformed: {1}")]
    EnvVarMalformed(&'static str, String),
}

impl SpendError {
    /// Maps this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        use SpendError::*;
        match self {
            InvalidEncoding(_) | FromHexError(_) | InvalidPublicKey(_) | TagTooLarge(_)
            | InvalidTxId(_) | BitcoinConsensusEncodeError(_) | JsonError(_) => ErrorKind::Decode,
            AddressDerivationFailed(_)
            | InvalidDestinationAddress(_)
            | InvalidChangeAddress(_) => ErrorKind::Address,
            InsufficientFunds { .. } | DigestComputationFailed(_) => ErrorKind::Digest,
            Secp256k1Error(_)
            | SignatureError(_)
            | TxInputNotFound
            | WitnessAlreadySet => ErrorKind::Signature,
            MissingKeyMaterial(_) => ErrorKind::MissingKeyMaterial,
            ConfigError(_) | EnvVarNotSet(..) | EnvVarMalformed(..) => ErrorKind::Config,
        }
    }
}
