//! The message capability.
//!
//! Every transaction message the signing path can handle implements [`Msg`]:
//! it reports its type URL and Amino name, resolves its signers and renders
//! its Amino-JSON form. Concrete messages are registered with a
//! [`CodecRegistry`](crate::registry::CodecRegistry) through
//! [`RegisteredMsg`], which adds the constants and codecs the registry needs.

use alloy_primitives::Address;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Debug;
use std::str::FromStr;

use crate::amino::{sort_value, to_sorted_json_bytes};
use crate::error::CodecError;

/// A decoded transaction message.
pub trait Msg: Debug + Send + Sync {
    /// Protobuf type URL, e.g. `/cosmos.bank.v1beta1.MsgSend`.
    fn type_url(&self) -> &'static str;

    /// Amino name written into the `type` field of the legacy JSON form.
    fn legacy_type_tag(&self) -> &'static str;

    /// Addresses that must sign this message, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidAddress`] if a signer field is not a valid
    /// account address.
    fn signers(&self) -> Result<Vec<Address>, CodecError>;

    /// The message body as it appears under `value` in Amino-JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn legacy_value(&self) -> Result<Value, CodecError>;

    /// The `{type, value}` Amino-JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn legacy_json(&self) -> Result<Value, CodecError> {
        Ok(json!({
            "type": self.legacy_type_tag(),
            "value": self.legacy_value()?,
        }))
    }

    /// Sorted, compact Amino-JSON bytes of [`legacy_json`](Self::legacy_json).
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    fn legacy_encode(&self) -> Result<Vec<u8>, CodecError> {
        Ok(to_sorted_json_bytes(&self.legacy_json()?)?)
    }
}

/// A message type that can be registered with a codec registry.
///
/// The protobuf codec comes from [`prost::Message`], the Amino-JSON codec
/// from serde.
pub trait RegisteredMsg: Msg + prost::Message + Default + DeserializeOwned + 'static {
    /// Protobuf type URL under which the message is packed into an `Any`.
    const TYPE_URL: &'static str;
    /// Amino name under which the message appears in legacy JSON.
    const AMINO_NAME: &'static str;
}

/// Serializes a message body into its sorted Amino-JSON value.
///
/// # Errors
///
/// Returns an error if `msg` cannot be serialized.
pub fn amino_value<T: Serialize>(msg: &T) -> Result<Value, CodecError> {
    Ok(sort_value(serde_json::to_value(msg)?))
}

/// Parses an account address held in the named message field.
///
/// # Errors
///
/// Returns [`CodecError::InvalidAddress`] if `value` is not a 20-byte hex
/// address.
pub fn parse_address(field: &'static str, value: &str) -> Result<Address, CodecError> {
    Address::from_str(value).map_err(|_| CodecError::InvalidAddress {
        field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Untagged;

    impl Msg for Untagged {
        fn type_url(&self) -> &'static str {
            "/test.Untagged"
        }

        fn legacy_type_tag(&self) -> &'static str {
            "test/Untagged"
        }

        fn signers(&self) -> Result<Vec<Address>, CodecError> {
            Ok(vec![])
        }

        fn legacy_value(&self) -> Result<Value, CodecError> {
            Ok(json!({"b": 1, "a": "x"}))
        }
    }

    #[test]
    fn test_legacy_encode_default() {
        let bytes = Untagged.legacy_encode().unwrap();
        assert_eq!(
            bytes,
            br#"{"type":"test/Untagged","value":{"a":"x","b":1}}"#
        );
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("from", "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap();
        assert_eq!(
            addr.to_checksum(None),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        let err = parse_address("from", "evmos1qqq").unwrap_err();
        assert!(matches!(err, CodecError::InvalidAddress { field: "from", .. }));
    }
}
