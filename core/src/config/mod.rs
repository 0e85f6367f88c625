//! # Configuration Options
//!
//! This module defines configuration options.
//!
//! This module is base for `cli` module and not dependent on it. Therefore,
//! this module can be used independently.
//!
//! ## Configuration File
//!
//! Configuration options can be read from a TOML file. File contents are
//! described in `SpendConfig` struct.

use crate::builder::address::ChangeNetworkPolicy;
use crate::builder::transaction::{SpendTxOptions, Utxo};
use crate::constants::{DEFAULT_SECRET_NAME, DEFAULT_TX_VERSION};
use crate::errors::SpendError;
use bitcoin::transaction::Version;
use bitcoin::{Amount, Network};
use serde::Deserialize;
use std::{fs::File, io::Read, path::PathBuf};

pub mod env;

/// Everything one spend needs, apart from the private key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpendConfig {
    /// Network addresses are derived for and decoded against.
    pub network: Network,
    /// Compressed public key committed to in the locking script, hex.
    pub pubkey: String,
    /// Tag committed to in the locking script, hex.
    pub tag: String,
    /// Coin locked by the tag-commit script.
    pub utxo: Utxo,
    pub dest_address: String,
    pub change_address: String,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub send_amount: Amount,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub fee_amount: Amount,

    #[serde(default)]
    pub change_network_policy: ChangeNetworkPolicy,
    /// Name of the host secret holding the private key, used in sign mode.
    #[serde(default = "default_secret_name")]
    pub secret_name: String,
    #[serde(default = "default_tx_version")]
    pub tx_version: i32,
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.to_string()
}

fn default_tx_version() -> i32 {
    DEFAULT_TX_VERSION.0
}

impl SpendConfig {
    pub fn new() -> Self {
        SpendConfig {
            ..Default::default()
        }
    }

    pub fn tx_options(&self) -> SpendTxOptions {
        SpendTxOptions {
            version: Version(self.tx_version),
            change_policy: self.change_network_policy,
        }
    }

    pub fn try_parse_file(path: PathBuf) -> Result<Self, SpendError> {
        let mut contents = String::new();

        let mut file = match File::open(path.clone()) {
            Ok(f) => f,
            Err(e) => return Err(SpendError::ConfigError(e.to_string())),
        };

        if let Err(e) = file.read_to_string(&mut contents) {
            return Err(SpendError::ConfigError(e.to_string()));
        }

        tracing::trace!("Using configuration file: {:?}", path);

        SpendConfig::try_parse_from(contents)
    }

    pub fn try_parse_from(input: String) -> Result<Self, SpendError> {
        match toml::from_str::<SpendConfig>(&input) {
            Ok(c) => Ok(c),
            Err(e) => Err(SpendError::ConfigError(e.to_string())),
        }
    }
}

impl Default for SpendConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            pubkey: "0242f9da15eae56fe6aca65136738905c0afdb2c4edf379e107b3b00b98c7fc9f0"
                .to_string(),
            tag: "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef".to_string(),
            utxo: Utxo {
                txid: "4604a462372fc7f838e8e746685b53bdae1222e44be4601456c7e2882074028c"
                    .to_string(),
                vout: 0,
                amount: Amount::from_sat(121_768),
            },
            dest_address: "tb1qd4erjn4tvt52c92yv66lwju9pzsd2ltph0xe5s".to_string(),
            change_address: "tb1q5dgehs94wf5mgfasnfjsh4dqv6hz8e35w4w7tk".to_string(),
            send_amount: Amount::from_sat(7_000),
            fee_amount: Amount::from_sat(2_000),

            change_network_policy: ChangeNetworkPolicy::default(),
            secret_name: default_secret_name(),
            tx_version: default_tx_version(),
        }
    }
}
