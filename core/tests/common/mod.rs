//! # Common Utilities for Integration Tests

use secrecy::SecretString;
use std::cell::RefCell;
use std::collections::HashMap;
use tagspend_core::config::SpendConfig;
use tagspend_core::Host;

/// Secret key `0x11..11` and its compressed public key.
pub const TEST_SECRET_KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";
pub const TEST_PUBKEY: &str = "034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa";

/// Host that records logs, panics on abort and serves secrets from a map.
#[derive(Default)]
pub struct TestHost {
    pub logs: RefCell<Vec<String>>,
    pub secrets: HashMap<String, String>,
}

impl TestHost {
    pub fn with_secret(name: &str, value: &str) -> Self {
        TestHost {
            secrets: HashMap::from([(name.to_string(), value.to_string())]),
            ..Default::default()
        }
    }
}

impl Host for TestHost {
    fn log(&self, message: &str) {
        self.logs.borrow_mut().push(message.to_string());
    }

    fn abort(&self, reason: &str) -> ! {
        panic!("host aborted: {reason}");
    }

    fn get_secret(&self, name: &str) -> Option<SecretString> {
        self.secrets.get(name).cloned().map(SecretString::from)
    }
}

/// Reference deployment with the script key replaced by [`TEST_PUBKEY`], so
/// [`TEST_SECRET_KEY`] can sign for it.
pub fn signable_config() -> SpendConfig {
    SpendConfig {
        pubkey: TEST_PUBKEY.to_string(),
        ..Default::default()
    }
}
