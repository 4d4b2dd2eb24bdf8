//! Typed-data projection strategies.
//!
//! A [`Projector`] turns canonical Amino-JSON signing bytes into an EIP-712
//! [`TypedData`] object. Two strategies exist because wallets in the field
//! sign two different shapes:
//!
//! - [`CurrentProjector`] - one schema per message, domain keyed by chain id only
//! - [`LegacyProjector`] - one shared `MsgValue` schema plus a fee-payer field
//!
//! [`PROJECTORS`] lists them in the order a verifier tries them.

mod current;
mod legacy;

pub use current::CurrentProjector;
pub use legacy::LegacyProjector;

use alloy_primitives::Address;
use cosmsig::{ChainDomainId, CodecError, Msg, ValidationMode};
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::typed_data::TypedData;

/// Fee payer to record in a legacy projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeDelegationOptions {
    /// By convention the first signer of the first message.
    pub fee_payer: Address,
}

/// Everything a projector reads.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    /// Chain id for the signing domain.
    pub chain_id: ChainDomainId,
    /// Canonical Amino-JSON signing bytes.
    pub sign_bytes: &'a [u8],
    /// First message of the transaction; its shape seeds the legacy schema.
    pub primary_msg: &'a dyn Msg,
    /// Fee payer for the legacy projection.
    pub fee_delegation: Option<FeeDelegationOptions>,
}

/// A strategy for building typed data from signing bytes.
pub trait Projector: Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Payload rules the messages must satisfy before projection.
    fn validation_mode(&self) -> ValidationMode;

    /// Builds the typed data.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectionError`] if the signing bytes do not have the
    /// expected shape.
    fn project(&self, input: &ProjectionInput<'_>) -> Result<TypedData, ProjectionError>;
}

/// Projectors in the order a verifier tries them.
pub static PROJECTORS: [&dyn Projector; 2] = [&CurrentProjector, &LegacyProjector];

/// Why signing bytes could not be projected into typed data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProjectionError {
    /// The signing bytes are not JSON.
    #[error("failed to JSON unmarshal data: {0}")]
    Json(#[from] serde_json::Error),
    /// A value that must be a JSON object is not one.
    #[error("{what} is not a JSON object")]
    NotAnObject {
        /// What was expected to be an object.
        what: &'static str,
    },
    /// The document has no `msgs` array.
    #[error("expected msgs field to be an array")]
    MissingMessages,
    /// Message `index` is not a JSON object.
    #[error("message {index} is not a valid JSON object")]
    MessageNotObject {
        /// Position of the message.
        index: usize,
    },
    /// Flattening would overwrite an existing top-level field.
    #[error("malformed payload received, did not expect to find key {field}")]
    DuplicateMessageField {
        /// The `msg{i}` key that already exists.
        field: String,
    },
    /// Message `index` has no usable `type` tag.
    #[error("malformed type value in message {index}, expected a non-empty string")]
    MalformedMessageType {
        /// Position of the message.
        index: usize,
    },
    /// Too many differently shaped definitions share one type name.
    #[error("exceeded maximum number of duplicates for type definition {type_name}")]
    TooManyDuplicateTypes {
        /// The base type name.
        type_name: String,
    },
    /// A legacy type name would be redefined with a different shape.
    #[error("type {type_name} already exists with a different definition")]
    ConflictingType {
        /// The conflicting type name.
        type_name: String,
    },
    /// The document has no `fee` object to record the fee payer in.
    #[error("cannot parse fee from tx data")]
    MissingFee,
    /// The primary message could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Parses signing bytes into a top-level JSON object.
fn parse_object(sign_bytes: &[u8]) -> Result<Map<String, Value>, ProjectionError> {
    match serde_json::from_slice(sign_bytes)? {
        Value::Object(object) => Ok(object),
        _ => Err(ProjectionError::NotAnObject { what: "sign doc" }),
    }
}
