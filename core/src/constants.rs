use bitcoin::{transaction::Version, Amount, EcdsaSighashType, Sequence};

/// Change at or below this value is folded into the miner fee.
pub const DUST_THRESHOLD: Amount = Amount::from_sat(546);

/// Signature coverage used for every digest. Not configurable.
pub const SPEND_SIGHASH_TYPE: EcdsaSighashType = EcdsaSighashType::All;

pub const DEFAULT_TX_VERSION: Version = Version::TWO;

pub const DEFAULT_SEQUENCE: Sequence = Sequence::MAX;

/// The single input every spend transaction has.
pub const SPEND_INPUT_INDEX: usize = 0;

/// Consensus limit for a single pushed script element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

pub const DEFAULT_SECRET_NAME: &str = "SPEND_PRIVATE_KEY";
