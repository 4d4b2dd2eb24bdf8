//! Error type for sign-document decoding, projection and hashing.

use cosmsig::{CodecError, InvalidChainId, ValidationError};

use crate::projector::ProjectionError;

/// Errors raised while turning sign-document bytes into EIP-712 bytes.
///
/// The signature verifier folds every one of these into a plain `false`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Eip712Error {
    /// The decoder was built without an encoding configuration.
    #[error("missing codec: codecs have not been initialized with an encoding configuration")]
    CodecNotInitialized,
    /// Part of the document failed to decode.
    #[error("failed to decode {path}: {cause}")]
    DecodeFailure {
        /// Which part failed, e.g. `fee`, `msgs[0]` or `auth_info`.
        path: String,
        /// The codec failure.
        #[source]
        cause: CodecError,
    },
    /// The chain id of a protobuf document does not parse.
    #[error("invalid chain ID passed as argument: {0}")]
    InvalidChainId(#[from] InvalidChainId),
    /// The chain id of an Amino document does not parse. Details are dropped.
    #[error("invalid chain ID passed as argument")]
    InvalidChainIdArgument,
    /// The protobuf body uses a field EIP-712 signing cannot represent.
    #[error("body contains unsupported field: {name}")]
    UnsupportedField {
        /// Name of the protobuf field.
        name: &'static str,
    },
    /// The protobuf auth info does not carry exactly one signer.
    #[error("invalid number of signer infos provided, expected 1 got {got}")]
    InvalidSignerCount {
        /// Number of signer infos present.
        got: usize,
    },
    /// The messages cannot be signed as one EIP-712 payload.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The document could not be projected into typed data.
    #[error("could not convert to EIP712 representation: {0}")]
    Projection(#[from] ProjectionError),
    /// The typed data is structurally unusable.
    #[error("invalid typed data: {0}")]
    InvalidTypedData(&'static str),
    /// The message carries a field its type schema does not declare.
    #[error("there is extra data provided in the message: `{path}` is not declared")]
    UndeclaredField {
        /// Dotted location of the field, e.g. `fee.payer`.
        path: String,
    },
    /// The hashing library rejected the typed data.
    #[error("EIP-712 hashing failed: {0}")]
    Hashing(#[from] alloy_dyn_abi::Error),
    /// Typed data could not be converted for hashing.
    #[error("typed data JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Neither decoding path produced valid typed data.
    #[error("could not decode sign doc as either Amino or Protobuf.\n amino: {amino}\n protobuf: {protobuf}")]
    AmbiguousOrUnparsableSignDoc {
        /// Why the Amino path failed.
        amino: Box<Self>,
        /// Why the protobuf path failed.
        protobuf: Box<Self>,
    },
}

impl Eip712Error {
    /// Wraps a codec failure at a document-level location.
    ///
    /// A failure that already carries its own location (such as `msgs[1]`)
    /// keeps it.
    #[must_use]
    pub fn decode_failure(default_path: &str, err: CodecError) -> Self {
        let (path, cause) = err.into_parts();
        Self::DecodeFailure {
            path: path.unwrap_or_else(|| default_path.to_owned()),
            cause,
        }
    }
}
