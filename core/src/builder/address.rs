use crate::builder::script::TagCommitScript;
use crate::errors::SpendError;
use bitcoin::address::NetworkUnchecked;
use bitcoin::hashes::{sha256, Hash};
use bitcoin::{Address, Network, ScriptBuf};
use serde::Deserialize;
use std::str::FromStr;

/// Which network the change address is checked against.
///
/// `MainChain` keeps the behavior deployed contracts rely on: the change
/// address is decoded with main chain parameters even when the spend targets
/// another network. Under that rule base58 addresses must carry main chain
/// version bytes while bech32 addresses keep whatever human readable part they
/// were encoded with, so a testnet `tb1..` change address is still accepted.
/// `Consistent` checks the change address against the spend's own network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeNetworkPolicy {
    #[default]
    MainChain,
    Consistent,
}

impl FromStr for ChangeNetworkPolicy {
    type Err = SpendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main_chain" => Ok(ChangeNetworkPolicy::MainChain),
            "consistent" => Ok(ChangeNetworkPolicy::Consistent),
            other => Err(SpendError::ConfigError(format!(
                "unknown change network policy {other}"
            ))),
        }
    }
}

/// Builds the tag-commit script for the given key and tag and derives its
/// P2WSH address.
///
/// # Returns
///
/// - [`Address`]: Segwit v0 script hash address on `network`
/// - [`ScriptBuf`]: The witness script that has to be revealed when spending
pub fn create_tag_commit_address(
    pubkey_hex: &str,
    tag_hex: &str,
    network: Network,
) -> Result<(Address, ScriptBuf), SpendError> {
    let script = TagCommitScript::from_hex(pubkey_hex, tag_hex)?.to_script_buf();
    let address = create_p2wsh_address(&script, network)?;

    tracing::debug!(%address, script = %hex::encode(script.as_bytes()), "Derived tag commit address");

    Ok((address, script))
}

/// Derives the P2WSH address of `script`, checking that its witness program
/// is `SHA256(script)`.
pub fn create_p2wsh_address(script: &ScriptBuf, network: Network) -> Result<Address, SpendError> {
    let address = Address::p2wsh(script, network);

    let witness_program = sha256::Hash::hash(script.as_bytes());
    match address.witness_program() {
        Some(program) if program.program().as_bytes() == witness_program.as_byte_array() => {
            Ok(address)
        }
        _ => Err(SpendError::AddressDerivationFailed(format!(
            "witness program of {address} does not commit to the script"
        ))),
    }
}

/// Parses `address` and requires it to belong to `network`.
pub fn decode_address(address: &str, network: Network) -> Result<Address, String> {
    let unchecked = Address::<NetworkUnchecked>::from_str(address).map_err(|e| e.to_string())?;

    unchecked
        .require_network(network)
        .map_err(|e| e.to_string())
}

/// Parses the change address according to `policy`. See
/// [`ChangeNetworkPolicy`] for what each policy accepts.
pub fn decode_change_address(
    address: &str,
    network: Network,
    policy: ChangeNetworkPolicy,
) -> Result<Address, SpendError> {
    let decoded = match policy {
        ChangeNetworkPolicy::Consistent => decode_address(address, network),
        ChangeNetworkPolicy::MainChain => decode_main_chain_lenient(address),
    };

    decoded.map_err(SpendError::InvalidChangeAddress)
}

fn decode_main_chain_lenient(address: &str) -> Result<Address, String> {
    let unchecked = Address::<NetworkUnchecked>::from_str(address).map_err(|e| e.to_string())?;

    if unchecked.is_valid_for_network(Network::Bitcoin) {
        return Ok(unchecked.assume_checked());
    }

    let checked = unchecked.assume_checked();
    if checked.witness_program().is_some() {
        tracing::warn!(
            %checked,
            "Change address is not a main chain address, accepting it because it is bech32"
        );
        return Ok(checked);
    }

    Err(format!("{checked} is not a main chain address"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_common::*;

    #[test]
    fn reference_address() {
        let (address, script) =
            create_tag_commit_address(REFERENCE_PUBKEY, REFERENCE_TAG, Network::Testnet)
                .expect("reference inputs are valid");

        assert_eq!(address.to_string(), REFERENCE_SCRIPT_ADDRESS);
        assert_eq!(
            hex::encode(script.as_bytes()),
            format!("21{REFERENCE_PUBKEY}ad20{REFERENCE_TAG}")
        );
    }

    #[test]
    fn address_follows_network() {
        let (main, _) =
            create_tag_commit_address(REFERENCE_PUBKEY, REFERENCE_TAG, Network::Bitcoin)
                .expect("valid");
        let (regtest, _) =
            create_tag_commit_address(REFERENCE_PUBKEY, REFERENCE_TAG, Network::Regtest)
                .expect("valid");

        assert_eq!(
            main.to_string(),
            "bc1q7eag20gm5vu6rguwc4hhq8d2jmpude8dhk9z3f0ztrw95nexdnfskf7cqc"
        );
        assert_eq!(
            regtest.to_string(),
            "bcrt1q7eag20gm5vu6rguwc4hhq8d2jmpude8dhk9z3f0ztrw95nexdnfsvcz30d"
        );
        assert_eq!(main.script_pubkey(), regtest.script_pubkey());
    }

    #[test]
    fn bad_pubkey_produces_no_address() {
        let err = create_tag_commit_address("nothex", REFERENCE_TAG, Network::Testnet)
            .expect_err("pubkey is malformed");
        assert_eq!(err.kind(), crate::errors::ErrorKind::Decode);
    }

    #[test]
    fn destination_must_match_network() {
        decode_address(REFERENCE_DEST, Network::Testnet).expect("testnet address on testnet");
        decode_address(REFERENCE_DEST, Network::Bitcoin).expect_err("testnet address on mainnet");
        decode_address("not an address", Network::Testnet).expect_err("garbage");
    }

    #[test]
    fn main_chain_policy_accepts_testnet_bech32_change() {
        let change = decode_change_address(
            REFERENCE_CHANGE,
            Network::Testnet,
            ChangeNetworkPolicy::MainChain,
        )
        .expect("bech32 change is accepted under main chain rules");
        let expected = decode_address(REFERENCE_CHANGE, Network::Testnet).expect("valid");

        assert_eq!(change.script_pubkey(), expected.script_pubkey());
    }

    #[test]
    fn main_chain_policy_rejects_testnet_base58_change() {
        // Testnet P2PKH address.
        let err = decode_change_address(
            "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn",
            Network::Testnet,
            ChangeNetworkPolicy::MainChain,
        )
        .expect_err("base58 testnet address is not a main chain address");
        assert!(matches!(err, SpendError::InvalidChangeAddress(_)));
    }

    #[test]
    fn consistent_policy_checks_spend_network() {
        decode_change_address(
            REFERENCE_CHANGE,
            Network::Testnet,
            ChangeNetworkPolicy::Consistent,
        )
        .expect("same network");

        let err = decode_change_address(
            REFERENCE_CHANGE,
            Network::Bitcoin,
            ChangeNetworkPolicy::Consistent,
        )
        .expect_err("testnet change on a mainnet spend");
        assert!(matches!(err, SpendError::InvalidChangeAddress(_)));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!(
            "consistent".parse::<ChangeNetworkPolicy>().expect("known"),
            ChangeNetworkPolicy::Consistent
        );
        assert!("sometimes".parse::<ChangeNetworkPolicy>().is_err());
    }
}
