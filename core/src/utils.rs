use crate::errors::SpendError;
use bitcoin::hashes::Hash;
use bitcoin::SegwitV0Sighash;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

lazy_static::lazy_static! {
    /// Global secp context.
    pub static ref SECP: bitcoin::secp256k1::Secp256k1<bitcoin::secp256k1::All> = bitcoin::secp256k1::Secp256k1::new();
}

/// Decodes a hex string, labelling the error with the field it came from.
pub fn decode_hex(field: &str, input: &str) -> Result<Vec<u8>, SpendError> {
    hex::decode(input.trim()).map_err(|e| SpendError::InvalidEncoding(format!("{field}: {e}")))
}

/// Hex of the digest bytes in the order they are signed.
pub fn sighash_hex(sighash: &SegwitV0Sighash) -> String {
    hex::encode(sighash.as_byte_array())
}

/// Initializes `tracing` as the logger.
///
/// # Parameters
///
/// - `level`: Level ranges from 0 to 5. 0 defaults to no logs but can be
///   overwritten with `RUST_LOG` env var. While other numbers sets log level
///   from lowest level (1) to highest level (5). Is is advised to use 0 on
///   tests and other values for binaries (get value from user).
///
/// # Returns
///
/// Returns `Err` if `tracing` can't be initialized. Multiple subscription error
/// is emitted and will return `Ok(())`.
pub fn initialize_logger(level: Option<LevelFilter>) -> Result<(), SpendError> {
    // Standard layer that will output human readable logs.
    let layer = fmt::layer().with_test_writer();
    // JSON layer that will output JSON formatted logs.
    let json_layer = fmt::layer::<Registry>().with_test_writer().json();

    let filter = match level {
        Some(level) => EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy(),
        None => EnvFilter::from_default_env(),
    };

    // Try to initialize tracing, depending on the `JSON_LOGS` env var,
    let res = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(json_layer).with(filter),
        )
    } else {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(layer).with(filter),
        )
    };

    if let Err(e) = res {
        // If it failed because of a re-initialization, do not care about
        // the error.
        if e.to_string() != "a global default trace dispatcher has already been set" {
            return Err(SpendError::ConfigError(e.to_string()));
        }

        tracing::trace!("Tracing is already initialized, skipping without errors...");
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_hex_reports_field() {
        let err = decode_hex("tag", "xyz").expect_err("not hex");
        assert!(err.to_string().contains("tag"));
        assert_eq!(decode_hex("tag", " 0a0b ").expect("valid"), vec![0x0a, 0x0b]);
    }

    #[test]
    fn sighash_hex_keeps_byte_order() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xc8;
        bytes[31] = 0xfc;
        let sighash = SegwitV0Sighash::from_byte_array(bytes);

        assert_eq!(sighash_hex(&sighash), hex::encode(bytes));
        assert!(sighash_hex(&sighash).starts_with("c8"));
        assert!(sighash_hex(&sighash).ends_with("fc"));
    }

    #[test]
    fn logger_reinitialization_is_ok() {
        initialize_logger(Some(LevelFilter::DEBUG)).expect("first init");
        initialize_logger(None).expect("second init is tolerated");
    }
}
