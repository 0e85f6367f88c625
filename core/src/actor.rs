//! # Signers
//!
//! [`Signer`] is the seam between the transaction builder and whatever holds
//! the private key. [`LocalSigner`] keeps the key in process memory and signs
//! with deterministic (RFC 6979) ECDSA, so the same key and digest always give
//! the same signature.

use crate::errors::SpendError;
use crate::utils::SECP;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Message, PublicKey, SecretKey};
use bitcoin::{ecdsa, PrivateKey, SegwitV0Sighash};
use secrecy::zeroize::Zeroize;
use secrecy::{ExposeSecret, SecretString};

/// Length of a hex encoded raw secret key.
const SECRET_KEY_HEX_LEN: usize = 64;

/// Produces `SIGHASH_ALL` signatures over segwit v0 digests.
pub trait Signer {
    fn public_key(&self) -> PublicKey;

    /// Signs `sighash` and returns the DER signature with the sighash type
    /// byte appended, ready to be placed in a witness.
    fn sign(&self, sighash: SegwitV0Sighash) -> Result<ecdsa::Signature, SpendError>;
}

pub struct LocalSigner {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl LocalSigner {
    pub fn new(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key(&SECP);

        LocalSigner {
            secret_key,
            public_key,
        }
    }

    /// Loads the key from a host secret. The secret is either 64 hex
    /// characters or a WIF string of any network.
    ///
    /// `name` only labels the errors, the secret itself never ends up in one.
    pub fn from_secret(name: &str, secret: Option<SecretString>) -> Result<Self, SpendError> {
        let secret = secret.ok_or_else(|| SpendError::MissingKeyMaterial(name.to_string()))?;
        let encoded = secret.expose_secret().trim();
        if encoded.is_empty() {
            return Err(SpendError::MissingKeyMaterial(name.to_string()));
        }

        let secret_key = if encoded.len() == SECRET_KEY_HEX_LEN
            && encoded.bytes().all(|b| b.is_ascii_hexdigit())
        {
            let mut bytes = hex::decode(encoded)?;
            let secret_key = SecretKey::from_slice(&bytes);
            bytes.zeroize();
            secret_key?
        } else {
            PrivateKey::from_wif(encoded)
                .map_err(|_| {
                    SpendError::InvalidEncoding(format!("{name}: not a hex or WIF private key"))
                })?
                .inner
        };

        Ok(Self::new(secret_key))
    }

    /// Checks `signature` against `sighash` and this signer's public key.
    pub fn verify(
        &self,
        sighash: SegwitV0Sighash,
        signature: &ecdsa::Signature,
    ) -> Result<(), SpendError> {
        let message = Message::from_digest(sighash.to_byte_array());
        SECP.verify_ecdsa(&message, &signature.signature, &self.public_key)?;

        Ok(())
    }
}

impl Signer for LocalSigner {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn sign(&self, sighash: SegwitV0Sighash) -> Result<ecdsa::Signature, SpendError> {
        let message = Message::from_digest(sighash.to_byte_array());
        let signature = SECP.sign_ecdsa(&message, &self.secret_key);

        Ok(ecdsa::Signature::sighash_all(signature))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("public_key", &self.public_key.to_string())
            .finish_non_exhaustive()
    }
}

impl Drop for LocalSigner {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}
