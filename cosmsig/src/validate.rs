//! Single-signer payload validation.
//!
//! An EIP-712 payload is signed by one Ethereum key, so every message in the
//! transaction must name exactly one signer and all of them must agree. The
//! legacy projection additionally describes every message with one shared
//! schema, so it also requires a single message type.

use crate::error::CodecError;
use crate::tx::CanonicalMessage;

/// Which projection the messages are validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Per-message schemas; only the signer rules apply.
    Current,
    /// One shared schema; messages must also share a type tag.
    Legacy,
}

/// Why a message list cannot be represented as an EIP-712 payload.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The transaction carries no messages.
    #[error("unable to build EIP-712 payload: transaction does not contain any messages")]
    NoMessages,
    /// A message does not have exactly one signer.
    #[error("unable to build EIP-712 payload: expect exactly 1 signer, message {index} has {got}")]
    MultipleOrZeroSigners {
        /// Position of the offending message.
        index: usize,
        /// Number of signers it declares.
        got: usize,
    },
    /// A message's signer differs from the first message's signer.
    #[error("unable to build EIP-712 payload: multiple signers detected at message {index}")]
    SignerMismatch {
        /// Position of the offending message.
        index: usize,
    },
    /// A message's type tag differs from the first message's tag.
    #[error("unable to build EIP-712 payload: different types of messages detected ({expected} vs {found})")]
    MixedMessageTypes {
        /// Tag of the first message.
        expected: String,
        /// Tag of the offending message.
        found: String,
    },
    /// A message's encoded form carries no type tag.
    #[error("could not decode message {index}: type is missing")]
    MissingTypeTag {
        /// Position of the offending message.
        index: usize,
    },
    /// A message could not be re-encoded to read its type tag.
    #[error("could not encode message to read its type: {0}")]
    TypeTagEncoding(#[from] CodecError),
}

/// Checks that `msgs` can be signed as one EIP-712 payload.
///
/// Messages are checked in order and the first violation is reported. In
/// [`ValidationMode::Legacy`] the type tag of each message is resolved before
/// its signer count is checked.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_payload_messages(
    msgs: &[CanonicalMessage],
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    let Some(first) = msgs.first() else {
        return Err(ValidationError::NoMessages);
    };

    let type_tag = |index: usize, msg: &CanonicalMessage| -> Result<String, ValidationError> {
        msg.type_tag()?
            .ok_or(ValidationError::MissingTypeTag { index })
    };
    let single_signer = |index: usize, msg: &CanonicalMessage| match msg.signers() {
        [signer] => Ok(*signer),
        signers => Err(ValidationError::MultipleOrZeroSigners {
            index,
            got: signers.len(),
        }),
    };

    let expected_type = match mode {
        ValidationMode::Legacy => Some(type_tag(0, first)?),
        ValidationMode::Current => None,
    };
    let expected_signer = single_signer(0, first)?;

    for (index, msg) in msgs.iter().enumerate().skip(1) {
        let found_type = match mode {
            ValidationMode::Legacy => Some(type_tag(index, msg)?),
            ValidationMode::Current => None,
        };
        let signer = single_signer(index, msg)?;

        if let (Some(expected), Some(found)) = (&expected_type, found_type) {
            if *expected != found {
                return Err(ValidationError::MixedMessageTypes {
                    expected: expected.clone(),
                    found,
                });
            }
        }
        if signer != expected_signer {
            return Err(ValidationError::SignerMismatch { index });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::Coin;
    use crate::msg::Msg;
    use crate::msgs::bank::{Input, MsgMultiSend, MsgSend};
    use crate::msgs::staking::MsgDelegate;
    use alloy_primitives::Address;
    use serde_json::{Value, json};

    const ALICE: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";
    const BOB: &str = "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF";

    fn send(from: &str) -> CanonicalMessage {
        CanonicalMessage::new(Box::new(MsgSend {
            from_address: from.into(),
            to_address: BOB.into(),
            amount: vec![Coin::new("aevmos", "1")],
        }))
        .unwrap()
    }

    fn delegate(from: &str) -> CanonicalMessage {
        CanonicalMessage::new(Box::new(MsgDelegate {
            delegator_address: from.into(),
            validator_address: "evmosvaloper1abc".into(),
            amount: None,
        }))
        .unwrap()
    }

    #[derive(Debug)]
    struct Untyped;

    impl Msg for Untyped {
        fn type_url(&self) -> &'static str {
            "/test.Untyped"
        }

        fn legacy_type_tag(&self) -> &'static str {
            ""
        }

        fn signers(&self) -> Result<Vec<Address>, CodecError> {
            Ok(vec![ALICE.parse().unwrap()])
        }

        fn legacy_value(&self) -> Result<Value, CodecError> {
            Ok(json!({}))
        }
    }

    #[test]
    fn test_rejects_empty_list() {
        for mode in [ValidationMode::Current, ValidationMode::Legacy] {
            assert!(matches!(
                validate_payload_messages(&[], mode),
                Err(ValidationError::NoMessages)
            ));
        }
    }

    #[test]
    fn test_accepts_single_signer() {
        let msgs = [send(ALICE), send(ALICE)];
        assert!(validate_payload_messages(&msgs, ValidationMode::Current).is_ok());
        assert!(validate_payload_messages(&msgs, ValidationMode::Legacy).is_ok());
    }

    #[test]
    fn test_rejects_multi_input_send() {
        let msg = CanonicalMessage::new(Box::new(MsgMultiSend {
            inputs: vec![
                Input {
                    address: ALICE.into(),
                    coins: vec![],
                },
                Input {
                    address: BOB.into(),
                    coins: vec![],
                },
            ],
            outputs: vec![],
        }))
        .unwrap();
        assert!(matches!(
            validate_payload_messages(&[msg], ValidationMode::Current),
            Err(ValidationError::MultipleOrZeroSigners { index: 0, got: 2 })
        ));
    }

    #[test]
    fn test_rejects_zero_signers() {
        let msg = CanonicalMessage::new(Box::new(MsgMultiSend::default())).unwrap();
        assert!(matches!(
            validate_payload_messages(&[msg], ValidationMode::Current),
            Err(ValidationError::MultipleOrZeroSigners { index: 0, got: 0 })
        ));
    }

    #[test]
    fn test_rejects_second_signer() {
        let msgs = [send(ALICE), send(BOB)];
        for mode in [ValidationMode::Current, ValidationMode::Legacy] {
            assert!(matches!(
                validate_payload_messages(&msgs, mode),
                Err(ValidationError::SignerMismatch { index: 1 })
            ));
        }
    }

    #[test]
    fn test_mixed_types_only_rejected_in_legacy_mode() {
        let msgs = [send(ALICE), delegate(ALICE)];
        assert!(validate_payload_messages(&msgs, ValidationMode::Current).is_ok());
        match validate_payload_messages(&msgs, ValidationMode::Legacy) {
            Err(ValidationError::MixedMessageTypes { expected, found }) => {
                assert_eq!(expected, "cosmos-sdk/MsgSend");
                assert_eq!(found, "cosmos-sdk/MsgDelegate");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_reported_before_signer_mismatch() {
        let msgs = [send(ALICE), delegate(BOB)];
        assert!(matches!(
            validate_payload_messages(&msgs, ValidationMode::Legacy),
            Err(ValidationError::MixedMessageTypes { .. })
        ));
    }

    #[test]
    fn test_missing_type_tag_in_legacy_mode() {
        let msg = CanonicalMessage::new(Box::new(Untyped)).unwrap();
        assert!(validate_payload_messages(std::slice::from_ref(&msg), ValidationMode::Current).is_ok());
        assert!(matches!(
            validate_payload_messages(&[msg], ValidationMode::Legacy),
            Err(ValidationError::MissingTypeTag { index: 0 })
        ));
    }
}
