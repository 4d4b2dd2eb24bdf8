//! Error type shared by the Amino-JSON and protobuf codecs.

/// Errors raised while decoding or encoding sign documents and messages.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The input is not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The input is not a valid protobuf encoding of the expected message.
    #[error("invalid protobuf: {0}")]
    Proto(#[from] prost::DecodeError),
    /// No message is registered under this Amino name.
    #[error("unknown Amino message type: {0}")]
    UnknownAminoType(String),
    /// No message is registered under this type URL.
    #[error("unknown message type URL: {0}")]
    UnknownTypeUrl(String),
    /// An address field does not hold a 20-byte hex account address.
    #[error("invalid address in `{field}`: {value}")]
    InvalidAddress {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A field required to build the canonical form is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// A tip is present but names no tipper.
    #[error("tipper cannot be empty")]
    EmptyTipper,
    /// A nested element failed to decode.
    #[error("{path}: {source}")]
    AtPath {
        /// Location of the element, e.g. `msgs[1]`.
        path: String,
        /// The underlying failure.
        source: Box<Self>,
    },
}

impl CodecError {
    /// Attaches the location of the element that failed to decode.
    #[must_use]
    pub fn at(self, path: impl Into<String>) -> Self {
        Self::AtPath {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Returns the element location and the underlying failure.
    ///
    /// Errors without a location report `None`.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Self) {
        match self {
            Self::AtPath { path, source } => (Some(path), *source),
            other => (None, other),
        }
    }
}
