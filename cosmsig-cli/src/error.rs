//! Error type for the command-line tool.

use alloy_primitives::{Address, hex};
use cosmsig::InvalidChainId;
use cosmsig_eip712::{Eip712Error, PubKeyError};
use std::io;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An `@path` input could not be read.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        /// The path after `@`.
        path: String,
        /// The I/O failure.
        #[source]
        source: io::Error,
    },
    /// An input is not valid hex.
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
    /// An input is not valid base64.
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The chain identifier does not parse.
    #[error(transparent)]
    ChainId(#[from] InvalidChainId),
    /// The sign document could not be decoded or projected.
    #[error(transparent)]
    Eip712(#[from] Eip712Error),
    /// The public key is malformed.
    #[error(transparent)]
    PubKey(#[from] PubKeyError),
    /// The signature covers neither the document nor its EIP-712 forms.
    #[error("signature is not valid for {address}")]
    InvalidSignature {
        /// Address of the key that was checked.
        address: Address,
    },
    /// Output could not be serialized.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
}
