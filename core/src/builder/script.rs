//! # Script Builder
//!
//! Script builder provides the locking script of a tag-commit spend:
//!
//! ```text
//! <pubkey> OP_CHECKSIGVERIFY <tag>
//! ```
//!
//! A failed signature check aborts the whole script. The tag is only pushed;
//! no comparison opcode follows it, so checking the revealed tag is left to
//! whoever inspects the spend.

use crate::constants::MAX_SCRIPT_ELEMENT_SIZE;
use crate::errors::SpendError;
use crate::utils::decode_hex;
use bitcoin::opcodes::all::{OP_CHECKSIGVERIFY, OP_PUSHBYTES_0, OP_PUSHNUM_NEG1};
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::secp256k1::PublicKey;
use bitcoin::ScriptBuf;

/// Length of a compressed secp256k1 public key.
const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Struct for scripts that require a signature from a key and carry a tag.
/// Contains the signing public key and the tag bytes respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCommitScript(pub(crate) PublicKey, PushBytesBuf);

impl TagCommitScript {
    pub fn new(pubkey: PublicKey, tag: Vec<u8>) -> Result<Self, SpendError> {
        let len = tag.len();
        if len > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(SpendError::TagTooLarge(len));
        }
        let tag = PushBytesBuf::try_from(tag).map_err(|_| SpendError::TagTooLarge(len))?;

        Ok(Self(pubkey, tag))
    }

    /// Decodes the public key and tag from hex. The key must be a 33 byte
    /// compressed encoding.
    pub fn from_hex(pubkey_hex: &str, tag_hex: &str) -> Result<Self, SpendError> {
        let pubkey_bytes = decode_hex("pubkey", pubkey_hex)?;
        if pubkey_bytes.len() != COMPRESSED_PUBKEY_LEN {
            return Err(SpendError::InvalidPublicKey(format!(
                "expected {COMPRESSED_PUBKEY_LEN} bytes, got {}",
                pubkey_bytes.len()
            )));
        }
        let pubkey = PublicKey::from_slice(&pubkey_bytes)
            .map_err(|e| SpendError::InvalidPublicKey(e.to_string()))?;

        let tag = decode_hex("tag", tag_hex)?;

        Self::new(pubkey, tag)
    }

    pub fn pubkey(&self) -> &PublicKey {
        &self.0
    }

    pub fn tag(&self) -> &[u8] {
        self.1.as_bytes()
    }

    pub fn to_script_buf(&self) -> ScriptBuf {
        let builder = Builder::new()
            .push_key(&bitcoin::PublicKey::new(self.0))
            .push_opcode(OP_CHECKSIGVERIFY);

        push_minimal(builder, &self.1).into_script()
    }
}

/// Pushes `data` with the shortest encoding, so small numbers become their
/// dedicated opcodes. Both an empty push and a single zero byte become `OP_0`.
fn push_minimal(builder: Builder, data: &PushBytesBuf) -> Builder {
    match data.as_bytes() {
        [] | [0] => builder.push_opcode(OP_PUSHBYTES_0),
        [n @ 1..=16] => builder.push_int(i64::from(*n)),
        [0x81] => builder.push_opcode(OP_PUSHNUM_NEG1),
        _ => builder.push_slice(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_common::{REFERENCE_PUBKEY, REFERENCE_TAG};

    #[test]
    fn reference_script_layout() {
        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, REFERENCE_TAG)
            .expect("reference inputs are valid")
            .to_script_buf();

        let expected = format!("21{REFERENCE_PUBKEY}ad20{REFERENCE_TAG}");
        assert_eq!(hex::encode(script.as_bytes()), expected);
    }

    #[test]
    fn script_is_deterministic() {
        let a = TagCommitScript::from_hex(REFERENCE_PUBKEY, REFERENCE_TAG).expect("valid");
        let b = TagCommitScript::from_hex(REFERENCE_PUBKEY, REFERENCE_TAG).expect("valid");
        assert_eq!(a.to_script_buf(), b.to_script_buf());
    }

    #[test]
    fn small_tags_use_minimal_pushes() {
        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "05")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad55"));

        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad00"));

        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "00")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad00"));

        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "0000")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad020000"));

        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "81")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad4f"));

        let script = TagCommitScript::from_hex(REFERENCE_PUBKEY, "11")
            .expect("valid")
            .to_script_buf();
        assert!(hex::encode(script.as_bytes()).ends_with("ad0111"));
    }

    #[test]
    fn rejects_malformed_pubkey() {
        let err = TagCommitScript::from_hex("02zz", REFERENCE_TAG).expect_err("not hex");
        assert!(matches!(err, SpendError::InvalidEncoding(_)));

        // Uncompressed prefix with 33 bytes is not a valid point encoding.
        let bad = format!("04{}", &REFERENCE_PUBKEY[2..]);
        let err = TagCommitScript::from_hex(&bad, REFERENCE_TAG).expect_err("bad prefix");
        assert!(matches!(err, SpendError::InvalidPublicKey(_)));

        let err = TagCommitScript::from_hex(&REFERENCE_PUBKEY[..64], REFERENCE_TAG)
            .expect_err("too short");
        assert!(matches!(err, SpendError::InvalidPublicKey(_)));
    }

    #[test]
    fn rejects_oversized_tag() {
        let tag = "ab".repeat(MAX_SCRIPT_ELEMENT_SIZE + 1);
        let err = TagCommitScript::from_hex(REFERENCE_PUBKEY, &tag).expect_err("too large");
        assert!(matches!(err, SpendError::TagTooLarge(521)));
    }
}
