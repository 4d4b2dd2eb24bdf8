//! Message resolution by Amino name and protobuf type URL.
//!
//! [`CodecRegistry`] maps both identifiers of every registered message type to
//! its decoder. It is built once, then shared read-only through an
//! [`EncodingConfig`](crate::config::EncodingConfig).

use prost_types::Any;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::fmt;

use crate::error::CodecError;
use crate::msg::{Msg, RegisteredMsg};
use crate::msgs::bank::{MsgMultiSend, MsgSend};
use crate::msgs::staking::MsgDelegate;

type AminoDecodeFn = fn(&RawValue) -> Result<Box<dyn Msg>, CodecError>;
type ProtoDecodeFn = fn(&[u8]) -> Result<Box<dyn Msg>, CodecError>;

#[derive(Deserialize)]
struct AminoEnvelope<'a> {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(borrow)]
    value: &'a RawValue,
}

fn decode_amino_value<M: RegisteredMsg>(raw: &RawValue) -> Result<Box<dyn Msg>, CodecError> {
    let msg: M = serde_json::from_str(raw.get())?;
    Ok(Box::new(msg))
}

fn decode_proto_value<M: RegisteredMsg>(bytes: &[u8]) -> Result<Box<dyn Msg>, CodecError> {
    let msg = M::decode(bytes)?;
    Ok(Box::new(msg))
}

/// Decoders for every registered message type.
#[derive(Default, Clone)]
pub struct CodecRegistry {
    amino: HashMap<&'static str, AminoDecodeFn>,
    proto: HashMap<&'static str, ProtoDecodeFn>,
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut type_urls: Vec<_> = self.proto.keys().collect();
        type_urls.sort();
        f.debug_struct("CodecRegistry")
            .field("type_urls", &type_urls)
            .finish_non_exhaustive()
    }
}

impl CodecRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in bank and staking messages.
    #[must_use]
    pub fn with_standard_msgs() -> Self {
        let mut registry = Self::new();
        registry
            .register::<MsgSend>()
            .register::<MsgMultiSend>()
            .register::<MsgDelegate>();
        registry
    }

    /// Registers a message type under its Amino name and type URL.
    ///
    /// A later registration of the same identifiers replaces the earlier one.
    pub fn register<M: RegisteredMsg>(&mut self) -> &mut Self {
        self.amino.insert(M::AMINO_NAME, decode_amino_value::<M>);
        self.proto.insert(M::TYPE_URL, decode_proto_value::<M>);
        self
    }

    /// Returns `true` if a message type is registered under `type_url`.
    #[must_use]
    pub fn contains_type_url(&self, type_url: &str) -> bool {
        self.proto.contains_key(type_url)
    }

    /// Decodes an Amino-JSON `{type, value}` message.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownAminoType`] for an unregistered name, or a
    /// JSON error if the envelope or body is malformed.
    pub fn decode_amino(&self, raw: &RawValue) -> Result<Box<dyn Msg>, CodecError> {
        let envelope: AminoEnvelope<'_> = serde_json::from_str(raw.get())?;
        let decode = self
            .amino
            .get(envelope.type_name.as_str())
            .ok_or_else(|| CodecError::UnknownAminoType(envelope.type_name.clone()))?;
        decode(envelope.value)
    }

    /// Unpacks a protobuf `Any` into the message registered for its type URL.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownTypeUrl`] for an unregistered type URL, or
    /// a protobuf error if the payload is malformed.
    pub fn unpack_any(&self, any: &Any) -> Result<Box<dyn Msg>, CodecError> {
        let decode = self
            .proto
            .get(any.type_url.as_str())
            .ok_or_else(|| CodecError::UnknownTypeUrl(any.type_url.clone()))?;
        decode(&any.value)
    }
}
