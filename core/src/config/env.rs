//! # Environment Variable Support For [`SpendConfig`]

use super::SpendConfig;
use crate::builder::address::ChangeNetworkPolicy;
use crate::builder::transaction::Utxo;
use crate::errors::SpendError;
use bitcoin::{Amount, Network};
use std::str::FromStr;

fn read_env(name: &'static str) -> Result<String, SpendError> {
    std::env::var(name).map_err(|e| SpendError::EnvVarNotSet(e, name))
}

fn read_env_then_parse<T: FromStr>(name: &'static str) -> Result<T, SpendError>
where
    T::Err: std::fmt::Display,
{
    read_env(name)?
        .parse::<T>()
        .map_err(|e| SpendError::EnvVarMalformed(name, e.to_string()))
}

fn read_optional_env_then_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, SpendError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(_) => read_env_then_parse(name).map(Some),
        Err(_) => Ok(None),
    }
}

impl SpendConfig {
    /// Reads the whole configuration from `SPEND_*` environment variables.
    ///
    /// A missing required variable returns [`SpendError::EnvVarNotSet`], so
    /// callers can tell it apart from a malformed value and fall back to a
    /// configuration file.
    pub fn from_env() -> Result<Self, SpendError> {
        let network = read_env_then_parse::<Network>("SPEND_NETWORK")?;
        let pubkey = read_env("SPEND_PUBKEY")?;
        let tag = read_env("SPEND_TAG")?;

        let utxo = Utxo {
            txid: read_env("SPEND_UTXO_TXID")?,
            vout: read_env_then_parse::<u32>("SPEND_UTXO_VOUT")?,
            amount: Amount::from_sat(read_env_then_parse::<u64>("SPEND_UTXO_AMOUNT")?),
        };

        let dest_address = read_env("SPEND_DEST_ADDRESS")?;
        let change_address = read_env("SPEND_CHANGE_ADDRESS")?;
        let send_amount = Amount::from_sat(read_env_then_parse::<u64>("SPEND_SEND_AMOUNT")?);
        let fee_amount = Amount::from_sat(read_env_then_parse::<u64>("SPEND_FEE_AMOUNT")?);

        let defaults = SpendConfig::default();
        let change_network_policy =
            read_optional_env_then_parse::<ChangeNetworkPolicy>("SPEND_CHANGE_NETWORK_POLICY")?
                .unwrap_or(defaults.change_network_policy);
        let secret_name = std::env::var("SPEND_SECRET_NAME").unwrap_or(defaults.secret_name);
        let tx_version = read_optional_env_then_parse::<i32>("SPEND_TX_VERSION")?
            .unwrap_or(defaults.tx_version);

        let config = SpendConfig {
            network,
            pubkey,
            tag,
            utxo,
            dest_address,
            change_address,
            send_amount,
            fee_amount,
            change_network_policy,
            secret_name,
            tx_version,
        };

        tracing::trace!("Spend config from env: {:?}", config);

        Ok(config)
    }
}
